use digest_core::{BackendError, PdfBackend};
use digest_pdf_mupdf::MupdfBackend;

const TWO_PAGES: &[u8] = include_bytes!("fixtures/two_pages.pdf");
/// RC4-40 encrypted with user password "secret".
const ENCRYPTED: &[u8] = include_bytes!("fixtures/encrypted.pdf");

#[test]
fn lines_become_items_in_page_order() {
    let pages = MupdfBackend::new().extract_pages(TWO_PAGES).unwrap();

    assert_eq!(
        pages,
        vec![
            vec!["Deep Learning for Proteins".to_string(), "Abstract".to_string()],
            vec!["Results".to_string(), "Conclusion".to_string()],
        ]
    );
}

#[test]
fn blank_lines_are_dropped() {
    let pages = MupdfBackend::new().extract_pages(TWO_PAGES).unwrap();
    assert!(pages.iter().flatten().all(|item| !item.trim().is_empty()));
}

#[test]
fn password_protected_document_is_rejected() {
    let err = MupdfBackend::new().extract_pages(ENCRYPTED).unwrap_err();
    assert!(matches!(err, BackendError::OpenError(_)), "{err:?}");
    assert!(err.to_string().contains("password"), "{err}");
}
