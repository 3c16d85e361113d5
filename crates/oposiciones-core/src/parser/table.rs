//! Registration table parser
//!
//! Parses the paginated "consulta de inscripciones" table into `Aspirant`
//! records.

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::Aspirant;

use super::{element_text, selector, PageReader};

/// Rows with fewer cells than this are not candidate rows.
pub const MIN_CELLS: usize = 5;

/// Column index of each field in a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub order: usize,
    pub lottery: usize,
    pub given_name: usize,
    pub surname: usize,
    pub shift: usize,
}

impl ColumnLayout {
    /// Layout used when the header cannot be interpreted:
    /// order, lottery number, given name, surname, shift.
    pub const POSITIONAL: ColumnLayout = ColumnLayout {
        order: 0,
        lottery: 1,
        given_name: 2,
        surname: 3,
        shift: 4,
    };

    /// Resolve the layout from header labels.
    ///
    /// Every field must be identified by exactly one header, otherwise
    /// `None` is returned and callers fall back to `POSITIONAL`.
    ///
    /// # Examples
    /// ```
    /// use oposiciones_core::parser::ColumnLayout;
    ///
    /// let headers: Vec<String> = ["Nº sorteo", "Nº orden", "Apellidos", "Nombre", "Turno"]
    ///     .iter().map(|h| h.to_string()).collect();
    /// let layout = ColumnLayout::from_headers(&headers).unwrap();
    /// assert_eq!(layout.order, 1);
    /// assert_eq!(layout.surname, 2);
    /// ```
    pub fn from_headers(headers: &[String]) -> Option<Self> {
        let mut order = None;
        let mut lottery = None;
        let mut given_name = None;
        let mut surname = None;
        let mut shift = None;

        for (idx, header) in headers.iter().enumerate() {
            let label = fold_label(header);
            // "apellido" before "nombre": a surname header may read "Primer apellido"
            let slot = if label.contains("apellido") {
                &mut surname
            } else if label.contains("nombre") {
                &mut given_name
            } else if label.contains("sorteo") {
                &mut lottery
            } else if label.contains("orden") {
                &mut order
            } else if label.contains("turno") {
                &mut shift
            } else {
                continue;
            };

            if slot.is_some() {
                return None;
            }
            *slot = Some(idx);
        }

        Some(Self {
            order: order?,
            lottery: lottery?,
            given_name: given_name?,
            surname: surname?,
            shift: shift?,
        })
    }
}

/// Lowercase and strip Spanish diacritics so header matching is lenient.
fn fold_label(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Parse one row's cell texts into a record.
///
/// Returns `None` for rows with fewer than `MIN_CELLS` cells or whose order
/// and lottery cells are not integers.
pub fn parse_row(cells: &[String], layout: &ColumnLayout) -> Option<Aspirant> {
    if cells.len() < MIN_CELLS {
        debug!("Skipping row with {} cells", cells.len());
        return None;
    }

    let cell = |idx: usize| cells.get(idx).map(|c| c.trim());

    let order_text = cell(layout.order)?;
    let lottery_text = cell(layout.lottery)?;

    let (order_number, lottery_number) =
        match (order_text.parse::<u32>(), lottery_text.parse::<u32>()) {
            (Ok(order), Ok(lottery)) => (order, lottery),
            _ => {
                warn!(
                    order = order_text,
                    lottery = lottery_text,
                    "Skipping row with malformed numeric fields"
                );
                return None;
            }
        };

    Some(Aspirant::new(
        order_number,
        lottery_number,
        cell(layout.given_name)?,
        cell(layout.surname)?,
        cell(layout.shift)?,
    ))
}

/// Parse the registration table of a rendered page.
///
/// # Returns
/// * `Ok(Some(records))` when a table body exists (records may be empty)
/// * `Ok(None)` when the page has no table body
/// * `Err(ScrapeError)` only if a selector fails to compile
pub fn parse_aspirant_rows(html: &str) -> Result<Option<Vec<Aspirant>>> {
    let document = Html::parse_document(html);
    let tbody_selector = selector("tbody")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let tbody = match document.select(&tbody_selector).next() {
        Some(tbody) => tbody,
        None => return Ok(None),
    };

    let layout = header_layout(&tbody)?.unwrap_or(ColumnLayout::POSITIONAL);

    let mut records = Vec::new();
    for row in tbody.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| element_text(&cell))
            .collect();

        if let Some(aspirant) = parse_row(&cells, &layout) {
            records.push(aspirant);
        }
    }

    Ok(Some(records))
}

/// Column layout from the header of the table owning `tbody`, if usable.
fn header_layout(tbody: &ElementRef) -> Result<Option<ColumnLayout>> {
    let table = match tbody.parent().and_then(ElementRef::wrap) {
        Some(table) => table,
        None => return Ok(None),
    };

    let header_selector = selector("thead th, thead td")?;
    let headers: Vec<String> = table
        .select(&header_selector)
        .map(|cell| element_text(&cell))
        .collect();

    if headers.is_empty() {
        return Ok(None);
    }

    let layout = ColumnLayout::from_headers(&headers);
    if layout.is_none() {
        debug!(?headers, "Header not recognised, using positional columns");
    }
    Ok(layout)
}

/// `PageReader` for the registration table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AspirantTable;

impl PageReader for AspirantTable {
    type Record = Aspirant;

    fn label(&self) -> &'static str {
        "registration table"
    }

    fn read(&self, html: &str) -> Result<Option<Vec<Aspirant>>> {
        parse_aspirant_rows(html)
    }

    fn is_ready(&self, html: &str) -> bool {
        let document = Html::parse_document(html);
        let (Ok(tbody_selector), Ok(row_selector)) = (selector("tbody"), selector("tr")) else {
            return false;
        };
        document
            .select(&tbody_selector)
            .next()
            .is_some_and(|tbody| tbody.select(&row_selector).next().is_some())
    }

    fn fingerprint(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let tbody_selector = selector("tbody").ok()?;
        let tbody = document.select(&tbody_selector).next()?;
        Some(element_text(&tbody))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(head: &str, rows: &[[&str; 5]]) -> String {
        let body: String = rows
            .iter()
            .map(|row| {
                let cells: String = row.iter().map(|c| format!("<td>{}</td>", c)).collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect();
        format!(
            "<html><body><table>{}<tbody>{}</tbody></table></body></html>",
            head, body
        )
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_rows_drops_non_numeric() {
        let html = table(
            "",
            &[
                ["1", "501", "Maria", "Garcia", "Libre"],
                ["x", "502", "Juan", "Lopez", "Turno B"],
                ["3", "abc", "Ana", "Ruiz", "Libre"],
                ["4", "-7", "Luis", "Sanz", "Libre"],
            ],
        );
        let records = parse_aspirant_rows(&html).unwrap().unwrap();
        assert_eq!(records, vec![Aspirant::new(1, 501, "Maria", "Garcia", "Libre")]);

        let json = serde_json::to_string(&records).unwrap();
        assert_eq!(
            json,
            r#"[{"numero_orden":1,"nombre_apellidos":"Garcia, Maria","numero_sorteo":501,"turno":"Libre"}]"#
        );
    }

    #[test]
    fn test_parse_rows_skips_short_rows() {
        let html = "<table><tbody>\
            <tr><td colspan=\"4\">Sin resultados</td></tr>\
            <tr><td>2</td><td>17</td><td>Ana</td><td>Pérez</td><td>Libre</td></tr>\
            </tbody></table>";
        let records = parse_aspirant_rows(html).unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Pérez, Ana");
    }

    #[test]
    fn test_parse_rows_collapses_cell_whitespace() {
        let html = "<table><tbody><tr>\
            <td> 3 </td><td>\n 40 \n</td><td>José  Luis</td><td>De la  Fuente</td><td> Discapacidad </td>\
            </tr></tbody></table>";
        let records = parse_aspirant_rows(html).unwrap().unwrap();
        assert_eq!(records[0], Aspirant::new(3, 40, "José Luis", "De la Fuente", "Discapacidad"));
    }

    #[test]
    fn test_parse_rows_without_tbody() {
        assert_eq!(parse_aspirant_rows("<html><body><p>Nada</p></body></html>").unwrap(), None);
    }

    #[test]
    fn test_parse_rows_empty_tbody() {
        let records = parse_aspirant_rows("<table><tbody></tbody></table>").unwrap();
        assert_eq!(records, Some(vec![]));
    }

    #[test]
    fn test_header_driven_layout() {
        let head = "<thead><tr><th>Nº Sorteo</th><th>Nº Orden</th><th>Apellidos</th>\
                    <th>Nombre</th><th>Turno</th></tr></thead>";
        let html = table(head, &[["501", "1", "Garcia", "Maria", "Libre"]]);
        let records = parse_aspirant_rows(&html).unwrap().unwrap();
        assert_eq!(records, vec![Aspirant::new(1, 501, "Maria", "Garcia", "Libre")]);
    }

    #[test]
    fn test_unrecognised_header_falls_back_to_positions() {
        let head = "<thead><tr><th>A</th><th>B</th><th>C</th><th>D</th><th>E</th></tr></thead>";
        let html = table(head, &[["1", "501", "Maria", "Garcia", "Libre"]]);
        let records = parse_aspirant_rows(&html).unwrap().unwrap();
        assert_eq!(records[0].order_number, 1);
        assert_eq!(records[0].lottery_number, 501);
    }

    #[test]
    fn test_layout_from_headers() {
        let headers = strings(&["Orden", "Sorteo", "Nombre", "Apellidos", "Turno"]);
        assert_eq!(ColumnLayout::from_headers(&headers), Some(ColumnLayout::POSITIONAL));

        let accented = strings(&["Número de orden", "Número de sorteo", "Nombre", "Apellidos", "Turno"]);
        assert_eq!(ColumnLayout::from_headers(&accented), Some(ColumnLayout::POSITIONAL));

        let missing = strings(&["Orden", "Sorteo", "Nombre y apellidos", "Turno"]);
        assert_eq!(ColumnLayout::from_headers(&missing), None);

        let duplicated = strings(&["Orden", "Orden", "Nombre", "Apellidos", "Turno"]);
        assert_eq!(ColumnLayout::from_headers(&duplicated), None);
    }

    #[test]
    fn test_parse_row_out_of_range_layout() {
        let layout = ColumnLayout {
            shift: 7,
            ..ColumnLayout::POSITIONAL
        };
        let cells = strings(&["1", "2", "Ana", "Ruiz", "Libre"]);
        assert_eq!(parse_row(&cells, &layout), None);
    }

    #[test]
    fn test_reader_readiness_and_fingerprint() {
        let reader = AspirantTable;
        assert!(!reader.is_ready("<table><tbody></tbody></table>"));
        assert!(!reader.is_ready("<p>cargando</p>"));

        let page_one = table("", &[["1", "501", "Maria", "Garcia", "Libre"]]);
        let page_two = table("", &[["2", "502", "Juan", "Lopez", "Libre"]]);
        assert!(reader.is_ready(&page_one));
        assert_ne!(reader.fingerprint(&page_one), reader.fingerprint(&page_two));
        assert_eq!(reader.fingerprint("<p></p>"), None);
    }

    proptest! {
        #[test]
        fn prop_short_rows_never_produce_records(cells in proptest::collection::vec("[0-9]{1,4}", 0..MIN_CELLS)) {
            prop_assert!(parse_row(&cells, &ColumnLayout::POSITIONAL).is_none());
        }

        #[test]
        fn prop_valid_rows_compose_full_name(
            order in 0u32..100_000,
            lottery in 0u32..100_000,
            given in "[A-Za-z]{1,12}",
            surname in "[A-Za-z]{1,12}",
        ) {
            let cells = vec![order.to_string(), lottery.to_string(), given.clone(), surname.clone(), "Libre".to_string()];
            let record = parse_row(&cells, &ColumnLayout::POSITIONAL).unwrap();
            prop_assert_eq!(record.full_name, format!("{}, {}", surname, given));
            prop_assert_eq!(record.order_number, order);
            prop_assert_eq!(record.lottery_number, lottery);
        }

        #[test]
        fn prop_non_numeric_lottery_drops_row(
            order in 0u32..100_000,
            lottery in "[A-Za-z][A-Za-z0-9]{0,6}",
        ) {
            let cells = vec![order.to_string(), lottery, "Ana".to_string(), "Ruiz".to_string(), "Libre".to_string()];
            prop_assert!(parse_row(&cells, &ColumnLayout::POSITIONAL).is_none());
        }
    }
}
