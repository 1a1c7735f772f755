use crate::models::CatalogItem;

use super::EngineError;

/// Fields concatenated into each document, in order
pub const DOCUMENT_FIELDS: [&str; 8] = [
    "title", "genre", "overview", "director", "star1", "star2", "star3", "star4",
];

/// Builds the text document for one catalog item.
///
/// Fields are joined with single spaces in `DOCUMENT_FIELDS` order. A field that
/// is absent or blank is a contract violation from ingestion and fails the build.
pub fn compose_document(index: usize, item: &CatalogItem) -> Result<String, EngineError> {
    let [star1, star2, star3, star4] = item.cast();
    let values = [
        Some(item.title.as_str()),
        item.genre.as_deref(),
        item.overview.as_deref(),
        item.director.as_deref(),
        star1,
        star2,
        star3,
        star4,
    ];

    let mut parts = Vec::with_capacity(values.len());
    for (field, value) in DOCUMENT_FIELDS.into_iter().zip(values) {
        match value {
            Some(text) if !text.trim().is_empty() => parts.push(text),
            _ => {
                return Err(EngineError::MissingField {
                    index,
                    title: item.title.clone(),
                    field,
                })
            }
        }
    }

    Ok(parts.join(" "))
}

/// Builds one document per catalog item, positionally aligned with the catalog
pub fn compose_documents(catalog: &[CatalogItem]) -> Result<Vec<String>, EngineError> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, item)| compose_document(index, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_item(title: &str) -> CatalogItem {
        CatalogItem::new(title)
            .with_genre("Drama")
            .with_overview("Two imprisoned men bond over a number of years.")
            .with_director("Frank Darabont")
            .with_cast(&["Tim Robbins", "Morgan Freeman", "Bob Gunton", "William Sadler"])
    }

    #[test]
    fn test_compose_joins_fields_in_order() {
        let document = compose_document(0, &complete_item("The Shawshank Redemption")).unwrap();
        assert_eq!(
            document,
            "The Shawshank Redemption Drama Two imprisoned men bond over a number of years. \
             Frank Darabont Tim Robbins Morgan Freeman Bob Gunton William Sadler"
        );
    }

    #[test]
    fn test_compose_documents_is_positionally_aligned() {
        let catalog = vec![complete_item("First"), complete_item("Second")];
        let documents = compose_documents(&catalog).unwrap();
        assert_eq!(documents.len(), catalog.len());
        assert!(documents[0].starts_with("First "));
        assert!(documents[1].starts_with("Second "));
    }

    #[test]
    fn test_missing_field_is_reported() {
        let mut item = complete_item("Heat");
        item.director = None;

        let err = compose_documents(&[complete_item("Ok"), item]).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingField {
                index: 1,
                title: "Heat".to_string(),
                field: "director",
            }
        );
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let item = complete_item("Heat").with_cast(&[
            "Al Pacino",
            "Robert De Niro",
            "Val Kilmer",
            "  ",
        ]);
        let err = compose_document(3, &item).unwrap_err();
        assert!(matches!(err, EngineError::MissingField { field: "star4", index: 3, .. }));
    }

    #[test]
    fn test_blank_title_is_missing() {
        let err = compose_document(0, &complete_item("")).unwrap_err();
        assert!(matches!(err, EngineError::MissingField { field: "title", .. }));
    }
}
