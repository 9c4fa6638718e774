//! Rendering retrieved passages into grading and generation documents

use crate::domain::pipeline::PassageFormat;
use crate::domain::vector_index::Passage;

/// Render passages in retrieval order
pub fn format_passages(passages: &[Passage], format: PassageFormat) -> Vec<String> {
    match format {
        PassageFormat::Plain => passages.iter().map(|p| p.content.clone()).collect(),
        PassageFormat::Tagged => passages.iter().map(tagged).collect(),
    }
}

fn tagged(passage: &Passage) -> String {
    let department = passage.department().unwrap_or("unknown");
    let mut rendered = format!(
        "<document><content>{}</content><department>{}</department>",
        passage.content.trim(),
        department
    );

    if passage.is_table() {
        if let Some(url) = passage.image_url() {
            rendered.push_str(&format!("<image_url>{}</image_url>", url));
        }
    }

    rendered.push_str("</document>");
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vector_index::{DEPARTMENT_KEY, IMAGE_URL_KEY, KIND_KEY};

    #[test]
    fn test_plain_keeps_content_and_order() {
        let passages = vec![Passage::new("1", "첫 번째 ", 0.9), Passage::new("2", "두 번째", 0.8)];

        let docs = format_passages(&passages, PassageFormat::Plain);
        assert_eq!(docs, vec!["첫 번째 ".to_string(), "두 번째".to_string()]);
    }

    #[test]
    fn test_tagged_with_department() {
        let passages = vec![Passage::new("1", " 취업률 85% \n", 0.9)
            .with_metadata(DEPARTMENT_KEY, "소프트웨어학과")];

        let docs = format_passages(&passages, PassageFormat::Tagged);
        assert_eq!(
            docs[0],
            "<document><content>취업률 85%</content><department>소프트웨어학과</department></document>"
        );
    }

    #[test]
    fn test_tagged_missing_department_is_unknown() {
        let docs = format_passages(&[Passage::new("1", "진출 분야", 0.5)], PassageFormat::Tagged);
        assert!(docs[0].contains("<department>unknown</department>"));
    }

    #[test]
    fn test_tagged_table_carries_image_url() {
        let table = Passage::new("1", "| 학년 | 과목 |", 0.5)
            .with_metadata(KIND_KEY, "table")
            .with_metadata(IMAGE_URL_KEY, "https://example.org/t.png");
        let text = Passage::new("2", "본문", 0.4)
            .with_metadata(IMAGE_URL_KEY, "https://example.org/ignored.png");

        let docs = format_passages(&[table, text], PassageFormat::Tagged);
        assert!(docs[0].ends_with("<image_url>https://example.org/t.png</image_url></document>"));
        assert!(!docs[1].contains("image_url"));
    }
}
