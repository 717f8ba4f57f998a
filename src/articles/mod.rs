pub mod search;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Name of the derived column holding the concatenated text fields
pub const FULL_TEXT_COLUMN: &str = "full_text";

/// Column names recognized as text fields when none are configured
pub const DEFAULT_TEXT_COLUMNS: [&str; 3] = ["title", "description", "text"];

/// Which columns of a built table feed `full_text` and which one is the title.
///
/// Saved with the fitted model so a reload reads the table exactly as it was
/// built, whatever columns the loader is configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLayout {
    /// header names in concatenation order
    pub text_columns: Vec<String>,
    pub title_column: String,
}

/// The article corpus: one row per article, identity = row position.
///
/// Keeps every source column so collaborators (e.g. a class label) survive a
/// rebuild, plus the derived `full_text` of each row.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleTable {
    /// source headers, without `full_text`
    headers: Vec<String>,
    /// source cells, `rows[i].len() == headers.len()`
    rows: Vec<Vec<String>>,
    /// positions of the text columns in `headers`, in header order
    text_columns: Vec<usize>,
    /// position of the column shown as an article title
    title_column: usize,
    full_text: Vec<String>,
}

impl ArticleTable {
    /// Build a table from raw headers and rows.
    ///
    /// `text_column_names` are matched case-insensitively against the headers;
    /// matching columns are joined with a single space, in header order, to
    /// form `full_text`. An existing `full_text` column is replaced.
    pub fn from_rows<S>(headers: Vec<String>, rows: Vec<Vec<String>>, text_column_names: &[S]) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let recognized: Vec<String> = text_column_names
            .iter()
            .map(|name| name.as_ref().to_lowercase())
            .collect();

        // 既存の full_text 列は作り直す
        let drop = headers.iter().position(|h| h == FULL_TEXT_COLUMN);
        let (headers, rows) = match drop {
            Some(pos) => {
                let mut headers = headers;
                headers.remove(pos);
                let rows = rows
                    .into_iter()
                    .map(|mut row| {
                        if pos < row.len() {
                            row.remove(pos);
                        }
                        row
                    })
                    .collect();
                (headers, rows)
            }
            None => (headers, rows),
        };

        let text_columns: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| recognized.contains(&h.to_lowercase()))
            .map(|(i, _)| i)
            .collect();
        if text_columns.is_empty() {
            return Err(Error::NoTextColumns {
                expected: recognized,
                found: headers,
            });
        }
        let title_column = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("title"))
            .unwrap_or(text_columns[0]);

        let width = headers.len();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        let full_text = rows
            .iter()
            .map(|row| {
                text_columns
                    .iter()
                    .map(|&c| row[c].as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        Ok(Self {
            headers,
            rows,
            text_columns,
            title_column,
            full_text,
        })
    }

    /// Load a source CSV (header row required)
    pub fn from_csv_path<P, S>(path: P, text_column_names: &[S]) -> Result<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(path = %path.display(), rows = rows.len(), columns = headers.len(), "loaded article csv");
        Self::from_rows(headers, rows, text_column_names)
    }

    /// Load a table written by `write_csv`; the stored `full_text` is kept as is.
    ///
    /// The text and title columns come from `layout`, not from configuration.
    pub fn read_artifact<P>(path: P, layout: &TextLayout) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let full_pos = headers
            .iter()
            .position(|h| h == FULL_TEXT_COLUMN)
            .ok_or_else(|| Error::ModelNotReady(format!("article table has no {FULL_TEXT_COLUMN} column")))?;
        headers.remove(full_pos);

        let mut rows = Vec::new();
        let mut full_text = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            full_text.push(row.remove(full_pos));
            rows.push(row);
        }

        let mut table = Self::from_rows(headers, rows, &layout.text_columns)?;
        if table.text_column_names() != layout.text_columns {
            return Err(Error::ModelNotReady(format!(
                "article table text columns {:?} do not match saved layout {:?}",
                table.text_column_names(),
                layout.text_columns
            )));
        }
        table.title_column = table
            .headers
            .iter()
            .position(|h| *h == layout.title_column)
            .ok_or_else(|| Error::ModelNotReady(format!("article table has no title column {:?}", layout.title_column)))?;
        table.full_text = full_text;
        Ok(table)
    }

    /// Write source columns plus `full_text`
    pub fn write_csv<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        let mut header: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        header.push(FULL_TEXT_COLUMN);
        writer.write_record(&header)?;
        for (row, text) in self.rows.iter().zip(&self.full_text) {
            writer.write_record(row.iter().map(String::as_str).chain(std::iter::once(text.as_str())))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Names of the text columns, in concatenation order
    pub fn text_column_names(&self) -> Vec<&str> {
        self.text_columns.iter().map(|&c| self.headers[c].as_str()).collect()
    }

    /// Name of the column used as the article title
    pub fn title_column_name(&self) -> &str {
        &self.headers[self.title_column]
    }

    /// Text and title columns, for saving with the model
    pub fn layout(&self) -> TextLayout {
        TextLayout {
            text_columns: self.text_column_names().into_iter().map(str::to_string).collect(),
            title_column: self.title_column_name().to_string(),
        }
    }

    /// All `full_text` values in row order
    pub fn full_texts(&self) -> &[String] {
        &self.full_text
    }

    pub fn full_text(&self, idx: usize) -> Option<&str> {
        self.full_text.get(idx).map(String::as_str)
    }

    pub fn title(&self, idx: usize) -> Option<&str> {
        self.cell(idx, self.title_column)
    }

    /// Value of `column` (case-insensitive) for row `idx`
    pub fn field(&self, idx: usize, column: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h.eq_ignore_ascii_case(column))?;
        self.cell(idx, col)
    }

    fn cell(&self, idx: usize, col: usize) -> Option<&str> {
        self.rows.get(idx).and_then(|row| row.get(col)).map(String::as_str)
    }

    fn text_cells(&self, idx: usize) -> impl Iterator<Item = &str> {
        let row = &self.rows[idx];
        self.text_columns.iter().map(move |&c| row[c].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> ArticleTable {
        ArticleTable::from_rows(
            strings(&["Class Index", "Title", "Description"]),
            vec![
                strings(&["1", "Cats and dogs", "play all day"]),
                strings(&["3", "Stocks", "rise today"]),
            ],
            &DEFAULT_TEXT_COLUMNS,
        )
        .unwrap()
    }

    #[test]
    fn full_text_joins_text_columns_in_header_order() {
        let t = sample();
        assert_eq!(t.len(), 2);
        assert_eq!(t.full_text(0), Some("Cats and dogs play all day"));
        assert_eq!(t.text_column_names(), vec!["Title", "Description"]);
        assert_eq!(t.title(1), Some("Stocks"));
        assert_eq!(t.field(0, "class index"), Some("1"));
        assert_eq!(t.full_text(2), None);
    }

    #[test]
    fn missing_text_columns_is_an_error() {
        let err = ArticleTable::from_rows(strings(&["id", "label"]), vec![], &DEFAULT_TEXT_COLUMNS).unwrap_err();
        assert!(matches!(err, Error::NoTextColumns { .. }));
    }

    #[test]
    fn title_falls_back_to_first_text_column() {
        let t = ArticleTable::from_rows(
            strings(&["Text", "Description"]),
            vec![strings(&["body", "desc"])],
            &DEFAULT_TEXT_COLUMNS,
        )
        .unwrap();
        assert_eq!(t.title(0), Some("body"));
        assert_eq!(t.full_text(0), Some("body desc"));
    }

    #[test]
    fn existing_full_text_column_is_rebuilt() {
        let t = ArticleTable::from_rows(
            strings(&["title", "full_text"]),
            vec![strings(&["fresh", "stale"])],
            &DEFAULT_TEXT_COLUMNS,
        )
        .unwrap();
        assert_eq!(t.headers(), &["title".to_string()]);
        assert_eq!(t.full_text(0), Some("fresh"));
    }

    #[test]
    fn short_rows_are_padded() {
        let t = ArticleTable::from_rows(
            strings(&["title", "description"]),
            vec![strings(&["only title"])],
            &DEFAULT_TEXT_COLUMNS,
        )
        .unwrap();
        assert_eq!(t.full_text(0), Some("only title "));
    }

    #[test]
    fn csv_artifact_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let t = sample();
        t.write_csv(&path).unwrap();
        let back = ArticleTable::read_artifact(&path, &t.layout()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn custom_layout_is_read_back_without_default_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let t = ArticleTable::from_rows(
            strings(&["id", "headline", "summary"]),
            vec![strings(&["7", "rain floods city", "roads closed"])],
            &["headline", "summary"],
        )
        .unwrap();
        let layout = t.layout();
        assert_eq!(layout.text_columns, strings(&["headline", "summary"]));
        assert_eq!(layout.title_column, "headline");

        t.write_csv(&path).unwrap();
        let back = ArticleTable::read_artifact(&path, &layout).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.title(0), Some("rain floods city"));
        assert_eq!(back.full_text(0), Some("rain floods city roads closed"));
    }

    #[test]
    fn layout_naming_absent_columns_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        sample().write_csv(&path).unwrap();
        let layout = TextLayout {
            text_columns: strings(&["headline"]),
            title_column: "headline".to_string(),
        };
        assert!(ArticleTable::read_artifact(&path, &layout).is_err());

        let layout = TextLayout {
            text_columns: strings(&["Title", "Description"]),
            title_column: "Headline".to_string(),
        };
        assert!(ArticleTable::read_artifact(&path, &layout).unwrap_err().is_not_ready());
    }

    #[test]
    fn read_artifact_without_full_text_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        std::fs::write(&path, "title\nhello\n").unwrap();
        let err = ArticleTable::read_artifact(&path, &sample().layout()).unwrap_err();
        assert!(err.is_not_ready());
    }
}
