use crate::config::{Layout, SelectorSet};
use crate::error::ParseError;
use crate::parsers::html;
use crate::results::VehicleRecord;

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_PAGE: &str = r#"
        <html><body>
          <div class="vehicle-list-cell">
            <div class="vehicle-year-make-model">2024 Subaru <span itemprop="model">WRX</span></div>
            <table><tr><td itemprop="color">Ceramic White</td><td itemprop="sku">
                S1234
            </td></tr></table>
          </div>
          <div class="vehicle-list-cell">
            <div class="vehicle-year-make-model">2024 Subaru <span itemprop="model">WRX Sport-tech</span></div>
            <table><tr><td itemprop="color">WR Blue Pearl</td><td itemprop="sku">S5678</td></tr></table>
          </div>
        </body></html>
    "#;

    const GRID_PAGE: &str = r#"
        <html><body>
          <div class="vehicle-grid-cell">
            <div class="vehicle-year-make-model-1"><span itemprop="model">WRX GT</span></div>
            <div class="vehicle-information-grid">G42</div>
          </div>
        </body></html>
    "#;

    fn record(name: &str, color: &str, sku: &str, location: &str) -> VehicleRecord {
        VehicleRecord::new(
            name.to_string(),
            color.to_string(),
            sku.to_string(),
            location.to_string(),
        )
    }

    #[test]
    fn test_list_layout_in_document_order() {
        let records = html::extract(LIST_PAGE, &Layout::List.selectors(), "markham").unwrap();
        assert_eq!(
            records,
            vec![
                record("WRX", "Ceramic White", "S1234", "markham"),
                record("WRX Sport-tech", "WR Blue Pearl", "S5678", "markham"),
            ]
        );
    }

    #[test]
    fn test_grid_layout_has_empty_color() {
        let records = html::extract(GRID_PAGE, &Layout::Grid.selectors(), "newmarket").unwrap();
        assert_eq!(records, vec![record("WRX GT", "", "G42", "newmarket")]);
    }

    #[test]
    fn test_missing_sub_elements_yield_empty_fields() {
        let page = r#"<div class="vehicle-grid-cell"><div class="vehicle-information-grid">X1</div></div>
                      <div class="vehicle-grid-cell"></div>"#;
        let records = html::extract(page, &Layout::Grid.selectors(), "barrie").unwrap();
        assert_eq!(
            records,
            vec![record("", "", "X1", "barrie"), record("", "", "", "barrie")]
        );
    }

    #[test]
    fn test_no_cards_yields_no_records() {
        let records = html::extract(GRID_PAGE, &Layout::List.selectors(), "pfaff").unwrap();
        assert!(records.is_empty());

        let records = html::extract("", &Layout::List.selectors(), "pfaff").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_nested_text_is_joined() {
        let selectors = SelectorSet {
            card: "li.car".to_string(),
            name: "h2".to_string(),
            color: Some(".color".to_string()),
            sku: ".stock".to_string(),
        };
        let page = r#"<ul><li class="car"><h2><b>WRX</b><i>TR</i></h2>
            <span class="color">Magnetite
              Gray</span><span class="stock">#77</span></li></ul>"#;

        let records = html::extract(page, &selectors, "downtown").unwrap();
        assert_eq!(records, vec![record("WRX TR", "Magnetite Gray", "#77", "downtown")]);
    }

    #[test]
    fn test_invalid_selector_is_parse_error() {
        let selectors = SelectorSet {
            card: ".car".to_string(),
            name: "h2".to_string(),
            color: Some("td[[".to_string()),
            sku: ".stock".to_string(),
        };

        let result = html::extract(LIST_PAGE, &selectors, "whitby");
        match result {
            Err(ParseError::InvalidSelector { field, .. }) => assert_eq!(field, "color"),
            other => panic!("expected invalid selector error, got {:?}", other),
        }
    }
}
