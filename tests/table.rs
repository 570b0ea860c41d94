use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use kira_binstage::error::BinStageError;
use kira_binstage::fs_ops::LocalFs;
use kira_binstage::table::QualityTable;
use kira_binstage::taxonomy::{ConsensusIssue, read_consensus};

fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, root)
}

#[test]
fn read_table_from_disk() {
    let (_temp, root) = utf8_tempdir();
    let path = root.join("18.p.bintable");
    fs::write(
        path.as_std_path(),
        "# header comment\nBin Id\tCompleteness\tContamination\nmetabat2.1\t96\t2\n",
    )
    .unwrap();

    let table = QualityTable::read(&LocalFs, &path).unwrap();
    assert_eq!(table.header.len(), 3);
    assert_eq!(table.rows.len(), 1);
}

#[test]
fn read_table_replaces_invalid_utf8() {
    let (_temp, root) = utf8_tempdir();
    let path = root.join("18.p.bintable");
    let mut bytes = b"#\nBin Id\tCompleteness\tContamination\nbin\xff\t96\t2\n".to_vec();
    bytes.extend_from_slice(b"concoct.1\t99\t1\n");
    fs::write(path.as_std_path(), bytes).unwrap();

    let table = QualityTable::read(&LocalFs, &path).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], "bin\u{FFFD}");
}

#[test]
fn read_table_missing_and_empty() {
    let (_temp, root) = utf8_tempdir();
    let missing = root.join("missing.bintable");
    assert_matches!(
        QualityTable::read(&LocalFs, &missing),
        Err(BinStageError::MissingTable(_))
    );

    let empty = root.join("empty.bintable");
    fs::write(empty.as_std_path(), "").unwrap();
    assert_matches!(
        QualityTable::read(&LocalFs, &empty),
        Err(BinStageError::EmptyTable(_))
    );
}

#[test]
fn read_consensus_from_disk() {
    let (_temp, root) = utf8_tempdir();
    let tax = root.join("bin.1.fa.tax");
    fs::write(tax.as_std_path(), "c1;k__Bacteria;s__Foo bar;0.9\n").unwrap();
    assert_eq!(read_consensus(&LocalFs, &tax).unwrap().as_str(), "s__Foo bar");

    let empty = root.join("bin.2.fa.tax");
    fs::write(empty.as_std_path(), "").unwrap();
    assert_eq!(read_consensus(&LocalFs, &empty), Err(ConsensusIssue::Empty));

    assert_eq!(
        read_consensus(&LocalFs, &root.join("bin.3.fa.tax")),
        Err(ConsensusIssue::Missing)
    );
}
