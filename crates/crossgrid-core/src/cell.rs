use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator joining the upper and lower halves of a split cell
pub const SEPARATOR: char = '|';
/// Raw value of a blocked square
pub const BLOCKED_MARKER: &str = "#";
/// Entry reported for cells that do not hold a single letter
pub const PLACEHOLDER: char = '_';

/// Direction of an arrow directive cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "arrow-left")]
    Left,
    #[serde(rename = "arrow-right")]
    Right,
    #[serde(rename = "arrow-up")]
    Up,
    #[serde(rename = "arrow-down")]
    Down,
    #[serde(rename = "arrow-up-right")]
    UpRight,
    #[serde(rename = "arrow-up-left")]
    UpLeft,
    #[serde(rename = "arrow-down-right")]
    DownRight,
    #[serde(rename = "arrow-down-left")]
    DownLeft,
    #[serde(rename = "arrow-right-up")]
    RightUp,
    #[serde(rename = "arrow-right-down")]
    RightDown,
    #[serde(rename = "arrow-left-up")]
    LeftUp,
    #[serde(rename = "arrow-left-down")]
    LeftDown,
}

impl Direction {
    pub const ALL: [Direction; 12] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::UpRight,
        Direction::UpLeft,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::RightUp,
        Direction::RightDown,
        Direction::LeftUp,
        Direction::LeftDown,
    ];

    /// The token stored in the grid document for this direction
    pub fn token(self) -> &'static str {
        match self {
            Direction::Left => "arrow-left",
            Direction::Right => "arrow-right",
            Direction::Up => "arrow-up",
            Direction::Down => "arrow-down",
            Direction::UpRight => "arrow-up-right",
            Direction::UpLeft => "arrow-up-left",
            Direction::DownRight => "arrow-down-right",
            Direction::DownLeft => "arrow-down-left",
            Direction::RightUp => "arrow-right-up",
            Direction::RightDown => "arrow-right-down",
            Direction::LeftUp => "arrow-left-up",
            Direction::LeftDown => "arrow-left-down",
        }
    }

    /// Unit steps `(row, col)` making up the arrow stroke.
    ///
    /// Straight arrows have a single leg. Compound names are read in order:
    /// `arrow-up-right` leaves the cell upward and then turns right, while
    /// `arrow-right-up` leaves rightward and then turns up.
    pub fn legs(self) -> &'static [(i8, i8)] {
        match self {
            Direction::Left => &[(0, -1)],
            Direction::Right => &[(0, 1)],
            Direction::Up => &[(-1, 0)],
            Direction::Down => &[(1, 0)],
            Direction::UpRight => &[(-1, 0), (0, 1)],
            Direction::UpLeft => &[(-1, 0), (0, -1)],
            Direction::DownRight => &[(1, 0), (0, 1)],
            Direction::DownLeft => &[(1, 0), (0, -1)],
            Direction::RightUp => &[(0, 1), (-1, 0)],
            Direction::RightDown => &[(0, 1), (1, 0)],
            Direction::LeftUp => &[(0, -1), (-1, 0)],
            Direction::LeftDown => &[(0, -1), (1, 0)],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .iter()
            .copied()
            .find(|d| d.token() == s)
            .ok_or(())
    }
}

/// One of the two editable halves of a split cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Upper,
    Lower,
}

impl Region {
    /// The neighbouring half in the given vertical direction, if any
    pub fn above(self) -> Option<Region> {
        match self {
            Region::Upper => None,
            Region::Lower => Some(Region::Upper),
        }
    }

    pub fn below(self) -> Option<Region> {
        match self {
            Region::Upper => Some(Region::Lower),
            Region::Lower => None,
        }
    }

    pub fn other(self) -> Region {
        match self {
            Region::Upper => Region::Lower,
            Region::Lower => Region::Upper,
        }
    }
}

/// The content of a single grid square
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Open square with nothing typed into it yet
    #[default]
    Empty,
    /// Filled-in, non-playable square (`#`)
    Blocked,
    /// A solution letter or digit
    Letter(char),
    /// Multi-character annotation shown in the hint style
    Hint(String),
    /// Arrow glyph pointing from a hint to its answer
    Directive(Direction),
    /// Two independently editable annotations stacked in one square
    Split { upper: String, lower: String },
}

impl Cell {
    /// Classify a raw document value.
    ///
    /// Lossless: `Cell::parse(raw).raw_value() == raw` for every string.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Cell::Empty;
        }
        if raw == BLOCKED_MARKER {
            return Cell::Blocked;
        }
        if let Some((upper, lower)) = raw.split_once(SEPARATOR) {
            return Cell::Split {
                upper: upper.to_string(),
                lower: lower.to_string(),
            };
        }
        if let Ok(direction) = raw.parse::<Direction>() {
            return Cell::Directive(direction);
        }
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Cell::Letter(c),
            _ => Cell::Hint(raw.to_string()),
        }
    }

    /// Flatten back to the raw document value
    pub fn raw_value(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Blocked => BLOCKED_MARKER.to_string(),
            Cell::Letter(c) => c.to_string(),
            Cell::Hint(text) => text.clone(),
            Cell::Directive(direction) => direction.token().to_string(),
            Cell::Split { upper, lower } => format!("{upper}{SEPARATOR}{lower}"),
        }
    }

    /// Canonical entry a solver sees: the letter itself, or the placeholder
    pub fn entry(&self) -> char {
        match self {
            Cell::Letter(c) => *c,
            _ => PLACEHOLDER,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Cell::Split { .. })
    }

    /// Text of one half of a split cell
    pub fn region_text(&self, region: Region) -> Option<&str> {
        match (self, region) {
            (Cell::Split { upper, .. }, Region::Upper) => Some(upper),
            (Cell::Split { lower, .. }, Region::Lower) => Some(lower),
            _ => None,
        }
    }

    /// Number of characters in the flattened value
    pub fn char_len(&self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Blocked | Cell::Letter(_) => 1,
            Cell::Hint(text) => text.chars().count(),
            Cell::Directive(direction) => direction.token().len(),
            Cell::Split { upper, lower } => upper.chars().count() + lower.chars().count() + 1,
        }
    }

    /// Styling flags derived from the content
    pub fn class(&self) -> CellClass {
        CellClass {
            empty: matches!(self, Cell::Blocked),
            hint: self.is_split() || self.char_len() > 1,
            arrow: match self {
                Cell::Directive(direction) => Some(*direction),
                _ => None,
            },
        }
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Cell::parse(raw)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_value())
    }
}

/// Styling flags recomputed on every reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellClass {
    /// Filled-in square
    pub empty: bool,
    /// Annotation rather than a solution letter
    pub hint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<Direction>,
}

impl CellClass {
    /// Whether the cell's text survives the export transform
    pub fn exports_text(&self) -> bool {
        self.hint || self.empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("#"), Cell::Blocked);
        assert_eq!(Cell::parse("A"), Cell::Letter('A'));
        assert_eq!(Cell::parse("7"), Cell::Letter('7'));
        assert_eq!(Cell::parse("river"), Cell::Hint("river".to_string()));
        assert_eq!(Cell::parse("arrow-down-left"), Cell::Directive(Direction::DownLeft));
        assert_eq!(
            Cell::parse("A|B"),
            Cell::Split {
                upper: "A".to_string(),
                lower: "B".to_string()
            }
        );
    }

    #[test]
    fn test_split_uses_first_separator() {
        assert_eq!(
            Cell::parse("a|b|c"),
            Cell::Split {
                upper: "a".to_string(),
                lower: "b|c".to_string()
            }
        );
        assert_eq!(
            Cell::parse("|"),
            Cell::Split {
                upper: String::new(),
                lower: String::new()
            }
        );
    }

    #[test]
    fn test_raw_value_is_lossless() {
        for raw in [
            "", "#", "A", "é", "hint text", "arrow-left", "arrow-right-down", "A|B", "|x",
            "x|", "|", "a|b|c", "arrow", "##",
        ] {
            assert_eq!(Cell::parse(raw).raw_value(), raw, "raw value {raw:?}");
        }
    }

    #[test]
    fn test_entry_placeholder() {
        assert_eq!(Cell::parse("").entry(), PLACEHOLDER);
        assert_eq!(Cell::parse("#").entry(), PLACEHOLDER);
        assert_eq!(Cell::parse("AB").entry(), PLACEHOLDER);
        assert_eq!(Cell::parse("A|B").entry(), PLACEHOLDER);
        assert_eq!(Cell::parse("arrow-up").entry(), PLACEHOLDER);
        assert_eq!(Cell::parse("Q").entry(), 'Q');
    }

    #[test]
    fn test_class_flags() {
        assert_eq!(Cell::Blocked.class(), CellClass { empty: true, hint: false, arrow: None });
        assert_eq!(Cell::Letter('A').class(), CellClass::default());
        assert!(Cell::parse("go").class().hint);
        assert!(Cell::parse("|").class().hint);

        let arrow = Cell::parse("arrow-up").class();
        assert!(arrow.hint);
        assert_eq!(arrow.arrow, Some(Direction::Up));
    }

    #[test]
    fn test_exports_text() {
        assert!(Cell::Blocked.class().exports_text());
        assert!(Cell::parse("clue").class().exports_text());
        assert!(!Cell::Letter('A').class().exports_text());
        assert!(!Cell::Empty.class().exports_text());
    }

    #[test]
    fn test_direction_tokens_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(direction.token().parse::<Direction>(), Ok(direction));
            let json = serde_json::to_string(&direction).unwrap();
            assert_eq!(json, format!("\"{}\"", direction.token()));
        }
        assert!("arrow-sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_region_neighbours() {
        assert_eq!(Region::Lower.above(), Some(Region::Upper));
        assert_eq!(Region::Upper.above(), None);
        assert_eq!(Region::Upper.below(), Some(Region::Lower));
        assert_eq!(Region::Lower.below(), None);
        assert_eq!(Region::Upper.other(), Region::Lower);
    }
}
