//! Test utilities for code that consumes board documents.
//!
//! This module provides [`DocumentBuilder`], which produces minimal SVG
//! documents honoring the structural contract described in the crate root.
//! It is used by this crate's own tests and by downstream session tests
//! that need a realistic puzzle document without a server.
//!
//! # Example
//!
//! ```
//! use dailoku_svg::{BoardSvg, testing::DocumentBuilder};
//!
//! let svg = DocumentBuilder::new().given(0, 0, '5').build();
//! let doc = BoardSvg::parse(&svg).unwrap();
//! assert!(doc.read_board().is_given(dailoku_core::Position::new(0, 0)));
//! ```

use std::fmt::Write as _;

use dailoku_core::Position;

/// Cell edge length used by generated documents.
pub const CELL_SIZE: f64 = 50.0;

/// Builds board documents for tests.
///
/// The generated document contains a full `cells` layer (81 rects on a
/// 50-unit grid), a `givens` layer, a `candidates` layer with all 81 groups
/// and their nine placeholders, and, unless disabled, an empty
/// `user-values` layer. Methods return `self` for chaining.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    givens: Vec<(u8, u8, char)>,
    user: Vec<(u8, u8, char)>,
    notes: Vec<(u8, u8, Vec<u8>)>,
    omit_user_layer: bool,
}

impl DocumentBuilder {
    /// Creates a builder for an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a given clue glyph.
    #[must_use]
    pub fn given(mut self, row: u8, col: u8, digit: char) -> Self {
        self.givens.push((row, col, digit));
        self
    }

    /// Adds a pre-rendered user digit glyph (admin preview style).
    #[must_use]
    pub fn user_value(mut self, row: u8, col: u8, digit: char) -> Self {
        self.user.push((row, col, digit));
        self
    }

    /// Pre-fills candidate glyph text for one cell.
    #[must_use]
    pub fn notes(mut self, row: u8, col: u8, digits: &[u8]) -> Self {
        self.notes.push((row, col, digits.to_vec()));
        self
    }

    /// Omits the `user-values` layer, as freshly rendered documents do.
    #[must_use]
    pub fn without_user_layer(mut self) -> Self {
        self.omit_user_layer = true;
        self
    }

    /// Renders the document to SVG text.
    #[must_use]
    pub fn build(&self) -> String {
        let mut s = String::new();
        s.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 450 450">"#);

        s.push_str(r#"<g id="cells">"#);
        for pos in Position::ALL {
            let x = f64::from(pos.col()) * CELL_SIZE;
            let y = f64::from(pos.row()) * CELL_SIZE;
            write!(
                s,
                r#"<rect x="{x}" y="{y}" width="{CELL_SIZE}" height="{CELL_SIZE}" data-row="{}" data-col="{}" data-box="{}" class="cell"/>"#,
                pos.row(),
                pos.col(),
                pos.box_index(),
            )
            .expect("writing to a String cannot fail");
        }
        s.push_str("</g>");

        s.push_str(r#"<g id="givens">"#);
        for (row, col, digit) in &self.givens {
            write!(
                s,
                r#"<text x="0" y="0" data-row="{row}" data-col="{col}">{digit}</text>"#
            )
            .expect("writing to a String cannot fail");
        }
        s.push_str("</g>");

        if !self.omit_user_layer {
            s.push_str(r#"<g id="user-values">"#);
            for (row, col, digit) in &self.user {
                write!(
                    s,
                    r#"<text x="0" y="0" data-row="{row}" data-col="{col}">{digit}</text>"#
                )
                .expect("writing to a String cannot fail");
            }
            s.push_str("</g>");
        }

        s.push_str(r#"<g id="candidates">"#);
        for pos in Position::ALL {
            write!(
                s,
                r#"<g data-row="{}" data-col="{}">"#,
                pos.row(),
                pos.col()
            )
            .expect("writing to a String cannot fail");
            let cell_notes = self
                .notes
                .iter()
                .find(|(row, col, _)| *row == pos.row() && *col == pos.col());
            for d in 1..=9u8 {
                if cell_notes.is_some_and(|(_, _, ds)| ds.contains(&d)) {
                    write!(s, r#"<text data-digit="{d}">{d}</text>"#)
                        .expect("writing to a String cannot fail");
                } else {
                    write!(s, r#"<text data-digit="{d}"/>"#)
                        .expect("writing to a String cannot fail");
                }
            }
            s.push_str("</g>");
        }
        s.push_str("</g>");

        s.push_str("</svg>");
        s
    }
}
