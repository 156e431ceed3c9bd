//! The parsed board document and the projection operations over it.

use std::fmt::{self, Display};

use dailoku_core::{Board, Digit, DigitSet, Position};
use xmltree::{Element, XMLNode};

/// Id of the selectable-cell layer.
const CELLS_LAYER_ID: &str = "cells";
/// Id of the immutable clue glyph layer.
const GIVENS_LAYER_ID: &str = "givens";
/// Id of the entered-digit layer (created when absent).
const USER_LAYER_ID: &str = "user-values";
/// Id of the pencil-mark layer.
const CANDIDATES_LAYER_ID: &str = "candidates";

/// Fraction of the cell height the baseline of an entered digit sits below
/// the cell's geometric center.
///
/// SVG `<text>` is positioned by baseline, so anchoring at the exact center
/// would make the glyph ride high; this shift puts its optical center on the
/// cell center for the ~0.6-cell-height font the page stylesheet uses.
pub const VALUE_BASELINE_RATIO: f64 = 0.22;

/// Geometry of one selectable cell rect, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Cell width.
    pub width: f64,
    /// Cell height.
    pub height: f64,
}

impl CellGeometry {
    /// Horizontal center of the cell.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Baseline y for an entered digit: the vertical center shifted down by
    /// [`VALUE_BASELINE_RATIO`] of the cell height.
    #[must_use]
    pub fn value_baseline_y(&self) -> f64 {
        self.y + self.height / 2.0 + self.height * VALUE_BASELINE_RATIO
    }
}

/// Errors raised while hydrating or serializing a board document.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SvgError {
    /// The document is not well-formed XML.
    #[display("failed to parse board document: {_0}")]
    Parse(xmltree::ParseError),
    /// A required structural layer is absent.
    #[display("board document is missing the '{_0}' layer")]
    MissingLayer(#[error(not(source))] &'static str),
    /// The cell layer does not define all 81 cells.
    #[display("cell layer defines {found} of 81 cells")]
    IncompleteCellLayer {
        /// Number of well-formed cell rects found.
        found: usize,
    },
    /// A cell rect is missing usable x/y/width/height.
    #[display("cell rect at {_0} has malformed geometry")]
    MalformedCell(#[error(not(source))] Position),
    /// The patched document could not be written back out.
    #[display("failed to serialize board document: {_0}")]
    Serialize(#[error(not(source))] xmltree::Error),
}

impl From<xmltree::ParseError> for SvgError {
    fn from(err: xmltree::ParseError) -> Self {
        Self::Parse(err)
    }
}

/// A hydrated board document.
///
/// Parsing locates the structural layers and caches per-cell geometry;
/// [`apply`](Self::apply) and [`highlight`](Self::highlight) then patch the
/// tree in place, and [`to_svg`](Self::to_svg) serializes the result.
#[derive(Debug, Clone)]
pub struct BoardSvg {
    root: Element,
    geometry: [CellGeometry; 81],
}

impl BoardSvg {
    /// Parses and hydrates a board document.
    ///
    /// The `cells`, `givens` and `candidates` layers must be present; a
    /// missing `user-values` layer is created empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not well-formed XML, a required
    /// layer is absent, or the cell layer does not describe all 81 cells.
    pub fn parse(svg: &str) -> Result<Self, SvgError> {
        let mut root = Element::parse(svg.as_bytes())?;

        let cells = find_by_id(&root, CELLS_LAYER_ID)
            .ok_or(SvgError::MissingLayer(CELLS_LAYER_ID))?;
        let mut geometry = [None; 81];
        for rect in child_elements(cells) {
            let Some(pos) = cell_position(rect) else {
                continue;
            };
            let geo = rect_geometry(rect).ok_or(SvgError::MalformedCell(pos))?;
            geometry[pos.index()] = Some(geo);
        }
        let found = geometry.iter().filter(|g| g.is_some()).count();
        if found != 81 {
            return Err(SvgError::IncompleteCellLayer { found });
        }
        let geometry = geometry.map(|g| g.unwrap_or(CellGeometry {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }));

        for layer in [GIVENS_LAYER_ID, CANDIDATES_LAYER_ID] {
            if find_by_id(&root, layer).is_none() {
                return Err(SvgError::MissingLayer(layer));
            }
        }

        if find_by_id(&root, USER_LAYER_ID).is_none() {
            log::debug!("document has no user-value layer, creating one");
            let mut layer = Element::new("g");
            layer
                .attributes
                .insert("id".to_string(), USER_LAYER_ID.to_string());
            root.children.push(XMLNode::Element(layer));
        }

        Ok(Self { root, geometry })
    }

    /// Returns the cached geometry for `pos`.
    #[must_use]
    pub fn cell_geometry(&self, pos: Position) -> CellGeometry {
        self.geometry[pos.index()]
    }

    /// Seeds a [`Board`] from glyphs already embedded in the document.
    ///
    /// Freshly published documents carry only givens; admin preview
    /// documents may arrive with user digits and pencil marks already
    /// rendered. Unparseable glyph text is skipped.
    #[must_use]
    pub fn read_board(&self) -> Board {
        let mut givens = [None; 81];
        if let Some(layer) = find_by_id(&self.root, GIVENS_LAYER_ID) {
            for glyph in child_elements(layer) {
                if let (Some(pos), Some(digit)) = (cell_position(glyph), glyph_digit(glyph)) {
                    givens[pos.index()] = Some(digit);
                }
            }
        }

        let mut values = [None; 81];
        if let Some(layer) = find_by_id(&self.root, USER_LAYER_ID) {
            for glyph in child_elements(layer) {
                if let (Some(pos), Some(digit)) = (cell_position(glyph), glyph_digit(glyph)) {
                    values[pos.index()] = Some(digit);
                }
            }
        }

        let mut candidates = [DigitSet::EMPTY; 81];
        if let Some(layer) = find_by_id(&self.root, CANDIDATES_LAYER_ID) {
            for group in child_elements(layer) {
                let Some(pos) = cell_position(group) else {
                    continue;
                };
                let mut mask = DigitSet::EMPTY;
                for glyph in child_elements(group) {
                    if let Some(digit) = glyph_digit(glyph) {
                        mask.insert(digit);
                    }
                }
                candidates[pos.index()] = mask;
            }
        }

        Board::from_givens(givens).with_progress(values, candidates)
    }

    /// Projects `board` onto the document.
    ///
    /// All previously rendered user digits are removed and re-inserted from
    /// the board's values, one glyph per non-empty cell at the cell center;
    /// every candidate placeholder's text is cleared and re-written from
    /// the board's masks.
    pub fn apply(&mut self, board: &Board) {
        let geometry = self.geometry;
        if let Some(layer) = find_by_id_mut(&mut self.root, USER_LAYER_ID) {
            layer.children.clear();
            for pos in Position::ALL {
                let Some(digit) = board.value(pos) else {
                    continue;
                };
                let geo = geometry[pos.index()];
                let mut glyph = Element::new("text");
                let attrs = &mut glyph.attributes;
                attrs.insert("x".to_string(), format_coord(geo.center_x()));
                attrs.insert("y".to_string(), format_coord(geo.value_baseline_y()));
                attrs.insert("text-anchor".to_string(), "middle".to_string());
                attrs.insert("class".to_string(), "user-value".to_string());
                attrs.insert("data-row".to_string(), pos.row().to_string());
                attrs.insert("data-col".to_string(), pos.col().to_string());
                glyph
                    .children
                    .push(XMLNode::Text(digit.as_char().to_string()));
                layer.children.push(XMLNode::Element(glyph));
            }
        }

        if let Some(layer) = find_by_id_mut(&mut self.root, CANDIDATES_LAYER_ID) {
            for group in child_elements_mut(layer) {
                let Some(pos) = cell_position(group) else {
                    continue;
                };
                let mask = board.notes(pos);
                for glyph in child_elements_mut(group) {
                    let digit = glyph
                        .attributes
                        .get("data-digit")
                        .and_then(|v| v.parse::<u8>().ok())
                        .filter(|d| (1..=9).contains(d))
                        .map(Digit::from_value);
                    match digit {
                        Some(d) if mask.contains(d) => set_text(glyph, &d.as_char().to_string()),
                        _ => set_text(glyph, ""),
                    }
                }
            }
        }
    }

    /// Updates selection and same-value styling on the cell rects.
    ///
    /// Every rect in `selected` gets the `selected` class. When exactly one
    /// cell is selected and it shows a digit, every *other* cell showing
    /// that digit gets the `same-value` class; any other selection count
    /// clears same-value styling entirely.
    pub fn highlight(&mut self, selected: &[Position], board: &Board) {
        let same_digit = match selected {
            [sole] => board.digit_at(*sole),
            _ => None,
        };
        if let Some(layer) = find_by_id_mut(&mut self.root, CELLS_LAYER_ID) {
            for rect in child_elements_mut(layer) {
                let Some(pos) = cell_position(rect) else {
                    continue;
                };
                let is_selected = selected.contains(&pos);
                let is_same =
                    !is_selected && same_digit.is_some() && board.digit_at(pos) == same_digit;
                set_class_token(rect, "selected", is_selected);
                set_class_token(rect, "same-value", is_same);
            }
        }
    }

    /// Serializes the patched document back to SVG text.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be written out.
    pub fn to_svg(&self) -> Result<String, SvgError> {
        let mut buf = Vec::new();
        self.root.write(&mut buf).map_err(SvgError::Serialize)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Display for BoardSvg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoardSvg({} cells)", self.geometry.len())
    }
}

fn find_by_id<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
    if el.attributes.get("id").is_some_and(|v| v == id) {
        return Some(el);
    }
    el.children
        .iter()
        .filter_map(XMLNode::as_element)
        .find_map(|child| find_by_id(child, id))
}

fn find_by_id_mut<'a>(el: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if el.attributes.get("id").is_some_and(|v| v == id) {
        return Some(el);
    }
    el.children
        .iter_mut()
        .filter_map(XMLNode::as_mut_element)
        .find_map(|child| find_by_id_mut(child, id))
}

fn child_elements(el: &Element) -> impl Iterator<Item = &Element> {
    el.children.iter().filter_map(XMLNode::as_element)
}

fn child_elements_mut(el: &mut Element) -> impl Iterator<Item = &mut Element> {
    el.children.iter_mut().filter_map(XMLNode::as_mut_element)
}

/// Reads the `data-row`/`data-col` pair off an element, rejecting
/// out-of-range coordinates.
fn cell_position(el: &Element) -> Option<Position> {
    let row = el.attributes.get("data-row")?.parse::<u8>().ok()?;
    let col = el.attributes.get("data-col")?.parse::<u8>().ok()?;
    (row < 9 && col < 9).then(|| Position::new(row, col))
}

fn rect_geometry(el: &Element) -> Option<CellGeometry> {
    let attr = |name: &str| el.attributes.get(name)?.parse::<f64>().ok();
    Some(CellGeometry {
        x: attr("x")?,
        y: attr("y")?,
        width: attr("width")?,
        height: attr("height")?,
    })
}

/// Reads a single digit glyph out of an element's text content.
fn glyph_digit(el: &Element) -> Option<Digit> {
    let text = el.get_text()?;
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Digit::from_char(first)
}

fn set_text(el: &mut Element, text: &str) {
    el.children
        .retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    if !text.is_empty() {
        el.children.push(XMLNode::Text(text.to_string()));
    }
}

fn set_class_token(el: &mut Element, token: &str, on: bool) {
    let mut tokens: Vec<&str> = el
        .attributes
        .get("class")
        .map(|c| c.split_whitespace().filter(|t| *t != token).collect())
        .unwrap_or_default();
    if on {
        tokens.push(token);
    }
    let joined = tokens.join(" ");
    if joined.is_empty() {
        el.attributes.remove("class");
    } else {
        el.attributes.insert("class".to_string(), joined);
    }
}

fn format_coord(value: f64) -> String {
    // Shortest round-trip form; avoids "25.000000" noise in the output.
    format!("{value}")
}
