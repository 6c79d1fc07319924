use serde_json::json;

use docpipe::application::ports::FileLoader;
use docpipe::domain::{Document, FileType};
use docpipe::infrastructure::text_processing::PptxAdapter;

use crate::helpers::fixtures;

fn pptx_document(data: &[u8]) -> Document {
    Document::new("deck.pptx", FileType::Pptx, data.len() as u64)
}

#[tokio::test]
async fn given_slides_out_of_archive_order_when_extracting_then_orders_numerically() {
    let data = fixtures::office_package(&[
        ("ppt/slides/slide10.xml", &fixtures::slide(&["Ten"])),
        ("ppt/slides/slide2.xml", &fixtures::slide(&["Two"])),
        ("ppt/slides/slide1.xml", &fixtures::slide(&["Title", "Body"])),
    ]);

    let text = PptxAdapter
        .extract_text(&data, &pptx_document(&data))
        .await
        .unwrap();

    assert_eq!(
        text,
        "--- Slide 1 ---\nTitle\nBody\n\n--- Slide 2 ---\nTwo\n\n--- Slide 3 ---\nTen"
    );
}

#[tokio::test]
async fn given_slide_without_text_when_extracting_then_skips_it_but_keeps_numbering() {
    let data = fixtures::office_package(&[
        ("ppt/slides/slide1.xml", &fixtures::slide(&[])),
        ("ppt/slides/slide2.xml", &fixtures::slide(&["Only"])),
    ]);

    let text = PptxAdapter
        .extract_text(&data, &pptx_document(&data))
        .await
        .unwrap();

    assert_eq!(text, "--- Slide 2 ---\nOnly");
}

#[tokio::test]
async fn given_presentation_when_extracting_metadata_then_counts_slides() {
    let data = fixtures::office_package(&[
        ("ppt/slides/slide1.xml", &fixtures::slide(&["a"])),
        ("ppt/slides/slide2.xml", &fixtures::slide(&["b"])),
        ("ppt/slideLayouts/slideLayout1.xml", &fixtures::slide(&[])),
    ]);

    let metadata = PptxAdapter
        .extract_metadata(&data, &pptx_document(&data))
        .await
        .unwrap();

    assert_eq!(metadata.get("num_slides"), Some(&json!(2)));
}

#[tokio::test]
async fn given_reordered_deck_when_extracting_then_follows_slide_id_list() {
    let data = fixtures::office_package(&[
        ("ppt/presentation.xml", &fixtures::presentation(&["rId3", "rId2"])),
        (
            "ppt/_rels/presentation.xml.rels",
            &fixtures::presentation_rels(&[
                ("rId2", "slides/slide1.xml"),
                ("rId3", "slides/slide2.xml"),
            ]),
        ),
        ("ppt/slides/slide1.xml", &fixtures::slide(&["Moved to second"])),
        ("ppt/slides/slide2.xml", &fixtures::slide(&["Shown first"])),
    ]);

    let text = PptxAdapter
        .extract_text(&data, &pptx_document(&data))
        .await
        .unwrap();

    assert_eq!(
        text,
        "--- Slide 1 ---\nShown first\n\n--- Slide 2 ---\nMoved to second"
    );
}

#[tokio::test]
async fn given_slide_part_absent_from_id_list_when_extracting_then_ignores_it() {
    let data = fixtures::office_package(&[
        ("ppt/presentation.xml", &fixtures::presentation(&["rId7"])),
        (
            "ppt/_rels/presentation.xml.rels",
            &fixtures::presentation_rels(&[("rId7", "/ppt/slides/slide4.xml")]),
        ),
        ("ppt/slides/slide4.xml", &fixtures::slide(&["Kept"])),
        ("ppt/slides/slide9.xml", &fixtures::slide(&["Orphaned"])),
    ]);
    let document = pptx_document(&data);

    let metadata = PptxAdapter.extract_metadata(&data, &document).await.unwrap();
    let text = PptxAdapter.extract_text(&data, &document).await.unwrap();

    assert_eq!(metadata.get("num_slides"), Some(&json!(1)));
    assert_eq!(text, "--- Slide 1 ---\nKept");
}
