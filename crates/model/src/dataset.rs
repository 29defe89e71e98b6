use std::cmp::Ordering;
use std::fmt;

/// Sort direction applied to one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == Direction::Ascending
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("ascending"),
            Direction::Descending => f.write_str("descending"),
        }
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Missing,
    Int(i64),
    /// Unsigned integers, for columns with values beyond `i64::MAX`.
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Field {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Field::Int(value) => Some(*value as f64),
            Field::UInt(value) => Some(*value as f64),
            Field::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Total order between two present cells.
    ///
    /// Numbers compare by value and sort before text; text compares bytewise.
    fn cmp_present(&self, other: &Field) -> Ordering {
        match (self, other) {
            (Field::Int(a), Field::Int(b)) => a.cmp(b),
            (Field::UInt(a), Field::UInt(b)) => a.cmp(b),
            (Field::Int(a), Field::UInt(b)) => i128::from(*a).cmp(&i128::from(*b)),
            (Field::UInt(a), Field::Int(b)) => i128::from(*a).cmp(&i128::from(*b)),
            (Field::Text(a), Field::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Field::Text(_), _) => Ordering::Greater,
            (_, Field::Text(_)) => Ordering::Less,
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Missing => Ok(()),
            Field::Int(value) => write!(f, "{value}"),
            Field::UInt(value) => write!(f, "{value}"),
            // Debug keeps the trailing `.0` on integral floats.
            Field::Float(value) => write!(f, "{value:?}"),
            Field::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Int(value)
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Field::UInt(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Float(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_owned())
    }
}

pub type Row = Vec<Field>;

/// An ordered sequence of rows sharing one column count.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    width: usize,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset, padding short rows with missing cells.
    ///
    /// Fails if any row is wider than `width`.
    pub fn new(width: usize, rows: Vec<Row>) -> anyhow::Result<Self> {
        let mut padded = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                anyhow::bail!(
                    "row {} has {} fields, expected at most {width}",
                    index + 1,
                    row.len()
                );
            }
            row.resize(width, Field::Missing);
            padded.push(row);
        }
        Ok(Dataset {
            width,
            rows: padded,
        })
    }

    /// Builds a dataset whose width is taken from the first row.
    pub fn from_rows(rows: Vec<Row>) -> anyhow::Result<Self> {
        let Some(width) = rows.first().map(Vec::len) else {
            anyhow::bail!("no columns to parse");
        };
        Self::new(width, rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Field> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Returns a copy with rows ordered by `column`.
    ///
    /// The sort is stable: rows with equal keys keep their relative order in
    /// both directions. Missing cells go last regardless of direction.
    pub fn sorted_by_column(&self, column: usize, direction: Direction) -> anyhow::Result<Self> {
        if column >= self.width {
            anyhow::bail!(
                "sort column {column} is out of range for a dataset with {} columns",
                self.width
            );
        }
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| compare_keys(&a[column], &b[column], direction));
        Ok(Dataset {
            width: self.width,
            rows,
        })
    }
}

fn compare_keys(a: &Field, b: &Field, direction: Direction) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction.apply(a.cmp_present(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(rows: &[(i64, &str)]) -> Dataset {
        let rows = rows
            .iter()
            .map(|(key, value)| vec![Field::Int(*key), Field::from(*value)])
            .collect();
        Dataset::from_rows(rows).unwrap()
    }

    #[test]
    fn stable_on_duplicate_keys() {
        let dataset = pairs(&[(1, "a"), (2, "b"), (1, "c")]);

        let ascending = dataset.sorted_by_column(0, Direction::Ascending).unwrap();
        assert_eq!(ascending, pairs(&[(1, "a"), (1, "c"), (2, "b")]));

        let descending = dataset.sorted_by_column(0, Direction::Descending).unwrap();
        assert_eq!(descending, pairs(&[(2, "b"), (1, "a"), (1, "c")]));
    }

    #[test]
    fn sorting_sorted_input_is_identity() {
        let dataset = pairs(&[(1, "x"), (2, "y"), (5, "z"), (9, "w")]);
        let sorted = dataset.sorted_by_column(0, Direction::Ascending).unwrap();
        assert_eq!(sorted, dataset);
    }

    #[test]
    fn missing_cells_sort_last_in_both_directions() {
        let rows = vec![
            vec![Field::Float(2.5)],
            vec![Field::Missing],
            vec![Field::Float(-1.0)],
        ];
        let dataset = Dataset::from_rows(rows).unwrap();

        let ascending = dataset.sorted_by_column(0, Direction::Ascending).unwrap();
        let keys: Vec<_> = ascending.column(0).cloned().collect();
        assert_eq!(keys, [Field::Float(-1.0), Field::Float(2.5), Field::Missing]);

        let descending = dataset.sorted_by_column(0, Direction::Descending).unwrap();
        let keys: Vec<_> = descending.column(0).cloned().collect();
        assert_eq!(keys, [Field::Float(2.5), Field::Float(-1.0), Field::Missing]);
    }

    #[test]
    fn text_sorts_bytewise() {
        let rows = ["pear", "Apple", "apple"]
            .into_iter()
            .map(|value| vec![Field::from(value)])
            .collect();
        let dataset = Dataset::from_rows(rows).unwrap();
        let sorted = dataset.sorted_by_column(0, Direction::Ascending).unwrap();
        let keys: Vec<_> = sorted.column(0).map(ToString::to_string).collect();
        assert_eq!(keys, ["Apple", "apple", "pear"]);
    }

    #[test]
    fn sorts_by_requested_column() {
        let dataset = pairs(&[(1, "c"), (2, "a"), (3, "b")]);
        let sorted = dataset.sorted_by_column(1, Direction::Ascending).unwrap();
        assert_eq!(sorted, pairs(&[(2, "a"), (3, "b"), (1, "c")]));
    }

    #[test]
    fn rejects_out_of_range_column() {
        let dataset = pairs(&[(1, "a")]);
        let err = dataset
            .sorted_by_column(2, Direction::Ascending)
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn pads_short_rows_and_rejects_wide_rows() {
        let dataset = Dataset::new(2, vec![vec![Field::Int(1)]]).unwrap();
        assert_eq!(dataset.rows()[0], [Field::Int(1), Field::Missing]);

        let wide = vec![vec![Field::Int(1), Field::Int(2), Field::Int(3)]];
        assert!(Dataset::new(2, wide).is_err());
        assert!(Dataset::from_rows(Vec::new()).is_err());
    }

    #[test]
    fn direction_flips_back_and_forth() {
        let direction = Direction::default();
        assert!(direction.is_ascending());
        assert_eq!(direction.flipped(), Direction::Descending);
        assert_eq!(direction.flipped().flipped(), Direction::Ascending);
        assert_eq!(Direction::Descending.to_string(), "descending");
    }
}
