//! Batch-level tests that need no network and no pdfium.

use docname::{BatchOutput, BatchStats, FileError, FileResult};
use std::io::{Cursor, Read};

fn success(original: &str, new_name: &str) -> FileResult {
    FileResult {
        original_name: original.into(),
        new_name: Some(new_name.into()),
        error: None,
        attempts: 1,
        duration_ms: 10,
    }
}

fn failed(original: &str, error: FileError) -> FileResult {
    FileResult {
        original_name: original.into(),
        new_name: None,
        error: Some(error),
        attempts: 0,
        duration_ms: 1,
    }
}

#[test]
fn archive_contains_exactly_the_successes() {
    // 3 documents, 2 renamed: the archive must hold exactly those 2,
    // keyed by computed name, mapping to the unmodified original bytes.
    let output = BatchOutput {
        results: vec![
            success("scan1.pdf", "25.01.01_DEC_1_A_Signed.pdf"),
            failed("scan2.pdf", FileError::UnreadablePdf),
            success("scan3.pdf", "25.01.02_MEMO_2_B_Signed.pdf"),
        ],
        successes: vec![
            ("25.01.01_DEC_1_A_Signed.pdf".into(), b"%PDF-1.4 one".to_vec()),
            ("25.01.02_MEMO_2_B_Signed.pdf".into(), b"%PDF-1.4 three".to_vec()),
        ],
        stats: BatchStats {
            total_files: 3,
            renamed_files: 2,
            failed_files: 1,
            total_attempts: 2,
            total_duration_ms: 21,
        },
    };

    let zip_bytes = output.zip_bytes().unwrap().expect("archive expected");
    let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut entry = archive
        .by_name("25.01.01_DEC_1_A_Signed.pdf")
        .expect("entry keyed by computed name");
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"%PDF-1.4 one");
    drop(entry);

    let mut entry = archive.by_name("25.01.02_MEMO_2_B_Signed.pdf").unwrap();
    bytes.clear();
    entry.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"%PDF-1.4 three");
}

#[test]
fn all_failures_means_no_archive() {
    let output = BatchOutput {
        results: vec![failed("a.pdf", FileError::UnreadablePdf)],
        successes: vec![],
        stats: BatchStats {
            total_files: 1,
            failed_files: 1,
            ..Default::default()
        },
    };
    assert!(output.zip_bytes().unwrap().is_none());
}

#[test]
fn offered_names_always_end_in_pdf() {
    let output = BatchOutput {
        results: vec![
            success("a.pdf", "25.01.01_DEC_1_A_Signed.pdf"),
            success("b.pdf", "25.01.02_CTR_9_Lease_Signed.pdf"),
        ],
        successes: vec![],
        stats: BatchStats::default(),
    };
    for result in &output.results {
        let name = result.new_name.as_deref().unwrap();
        assert!(name.to_ascii_lowercase().ends_with(".pdf"));
        assert!(!name.to_ascii_lowercase().ends_with(".pdf.pdf"));
    }
}
