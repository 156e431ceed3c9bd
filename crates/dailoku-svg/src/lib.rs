//! Visual sync layer: projects a [`Board`](dailoku_core::Board) onto the
//! server-rendered SVG board document, and seeds a board back out of a
//! pre-filled document.
//!
//! The layer is a one-way projection: it never decides *what* to mutate,
//! only reflects state already decided upstream. It depends on a small
//! structural contract in the document rather than on the full rendering
//! grammar:
//!
//! - a `#cells` layer with one `<rect>` per cell carrying `data-row`,
//!   `data-col`, `data-box` and geometric `x`/`y`/`width`/`height`;
//! - a `#givens` layer with immutable clue `<text>` glyphs tagged with
//!   `data-row`/`data-col`;
//! - a `#user-values` layer for entered digits (created empty if absent);
//! - a `#candidates` layer with one `<g>` per cell (`data-row`/`data-col`),
//!   each holding one `<text>` placeholder per digit tagged `data-digit`.
//!
//! Selection styling is expressed through the `selected` and `same-value`
//! class tokens on the cell rects.

mod document;
pub mod testing;

pub use document::{BoardSvg, CellGeometry, SvgError, VALUE_BASELINE_RATIO};
