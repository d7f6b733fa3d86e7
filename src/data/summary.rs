use std::collections::BTreeMap;
use std::fmt;

use super::model::{DType, Dataset};

/// Line width the description table is folded to.
pub const DESCRIBE_WIDTH: usize = 108;

// ---------------------------------------------------------------------------
// Summary – everything the report prints about the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Structural listing: rows, columns, dtypes, memory.
    pub info: String,
    /// `describe()` over the numeric columns.
    pub description: TextTable,
    /// Distinct non-null values per column.
    pub unique_counts: UniqueCounts,
}

/// Compute every summary block for `dataset`.
pub fn summarize(dataset: &Dataset) -> Summary {
    Summary {
        info: info(dataset),
        description: describe(dataset),
        unique_counts: nunique(dataset),
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// `count, mean, std, min, 25%, 50%, 75%, max` of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Statistics over the given (non-missing) values.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        ColumnStats {
            count,
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

pub fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

/// Standard deviation with `n - 1` in the denominator.
pub fn sample_std(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return f64::NAN;
    }
    let m = mean(v);
    let var = v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (v.len() as f64 - 1.0);
    var.sqrt()
}

/// Linear interpolation between closest ranks; `sorted` must be ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = (n - 1) as f64 * q;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// `describe()` of every numeric column as a printable table.
pub fn describe(dataset: &Dataset) -> TextTable {
    let mut table = TextTable::new(ColumnStats::LABELS.iter().map(|s| s.to_string()).collect());
    for col in dataset.numeric_columns() {
        let values: Vec<f64> = col.values.iter().filter_map(|v| v.as_f64()).collect();
        let stats = ColumnStats::from_values(&values);
        table.push_column(
            col.name.clone(),
            stats.as_row().iter().map(|&v| format_stat(v)).collect(),
        );
    }
    table
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

// ---------------------------------------------------------------------------
// TextTable – right-aligned grid folded to a line width
// ---------------------------------------------------------------------------

/// Row-labelled table of preformatted cells, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    index: Vec<String>,
    columns: Vec<(String, Vec<String>)>,
}

impl TextTable {
    pub fn new(index: Vec<String>) -> Self {
        TextTable {
            index,
            columns: Vec::new(),
        }
    }

    pub fn push_column(&mut self, name: String, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.index.len());
        self.columns.push((name, cells));
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Cell at (`row` label, `column` name).
    #[cfg(test)]
    pub fn cell(&self, row: &str, column: &str) -> Option<&str> {
        let r = self.index.iter().position(|l| l == row)?;
        let (_, cells) = self.columns.iter().find(|(n, _)| n == column)?;
        cells.get(r).map(|s| s.as_str())
    }

    /// Render, starting a new block of columns whenever a line would
    /// exceed `max_width`. Every block repeats the row labels.
    pub fn render(&self, max_width: usize) -> String {
        if self.columns.is_empty() {
            return "(no numeric columns)".to_string();
        }
        let label_w = self.index.iter().map(|s| s.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|(name, cells)| {
                cells
                    .iter()
                    .map(|c| c.len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut blocks: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut line = label_w;
        for (i, w) in widths.iter().enumerate() {
            if !current.is_empty() && line + 2 + w > max_width {
                blocks.push(std::mem::take(&mut current));
                line = label_w;
            }
            current.push(i);
            line += 2 + w;
        }
        blocks.push(current);

        let rendered: Vec<String> = blocks
            .iter()
            .map(|block| {
                let mut out = " ".repeat(label_w);
                for &c in block {
                    out.push_str(&format!("  {:>w$}", self.columns[c].0, w = widths[c]));
                }
                for (r, label) in self.index.iter().enumerate() {
                    out.push('\n');
                    out.push_str(&format!("{label:<label_w$}"));
                    for &c in block {
                        out.push_str(&format!("  {:>w$}", self.columns[c].1[r], w = widths[c]));
                    }
                }
                out
            })
            .collect();
        rendered.join("\n\n")
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(usize::MAX))
    }
}

// ---------------------------------------------------------------------------
// Distinct-value counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct UniqueCounts(pub Vec<(String, usize)>);

impl UniqueCounts {
    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<usize> {
        self.0.iter().find(|(n, _)| n == column).map(|(_, c)| *c)
    }
}

impl fmt::Display for UniqueCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_w = self.0.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let count_w = self.0.iter().map(|(_, c)| c.to_string().len()).max().unwrap_or(0);
        let lines: Vec<String> = self
            .0
            .iter()
            .map(|(name, count)| format!("{name:<name_w$}    {count:>count_w$}"))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Count of distinct non-null values in every column.
pub fn nunique(dataset: &Dataset) -> UniqueCounts {
    UniqueCounts(
        dataset
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.unique_values().len()))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Structural info
// ---------------------------------------------------------------------------

/// Pandas-style `info()` listing.
pub fn info(dataset: &Dataset) -> String {
    let rows = dataset.len();
    let mut out = String::new();
    if rows == 0 {
        out.push_str("RangeIndex: 0 entries\n");
    } else {
        out.push_str(&format!("RangeIndex: {rows} entries, 0 to {}\n", rows - 1));
    }
    out.push_str(&format!(
        "Data columns (total {} columns):\n",
        dataset.columns.len()
    ));

    let name_w = dataset
        .columns
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max("Column".len());
    let count_w = "Non-Null Count".len();
    out.push_str(&format!(
        " {:<3} {:<name_w$}  {:<count_w$}  Dtype\n",
        "#", "Column", "Non-Null Count"
    ));
    out.push_str(&format!(
        "{:<4} {:<name_w$}  {:<count_w$}  -----\n",
        "---", "------", "--------------"
    ));
    for (i, col) in dataset.columns.iter().enumerate() {
        out.push_str(&format!(
            " {:<3} {:<name_w$}  {:<count_w$}  {}\n",
            i,
            col.name,
            format!("{} non-null", col.non_null_count()),
            col.dtype
        ));
    }

    let mut tally: BTreeMap<DType, usize> = BTreeMap::new();
    for col in &dataset.columns {
        *tally.entry(col.dtype).or_default() += 1;
    }
    let dtypes: Vec<String> = tally.iter().map(|(d, n)| format!("{d}({n})")).collect();
    out.push_str(&format!("dtypes: {}\n", dtypes.join(", ")));

    let has_object = tally.contains_key(&DType::Object);
    let bytes = (rows * dataset.columns.len() * 8 + 128) as f64;
    out.push_str(&format!("memory usage: {}", sizeof_fmt(bytes, has_object)));
    out
}

fn sizeof_fmt(mut num: f64, plus: bool) -> String {
    let suffix = if plus { "+" } else { "" };
    for unit in ["bytes", "KB", "MB", "GB", "TB"] {
        if num < 1024.0 {
            return format!("{num:3.1}{suffix} {unit}");
        }
        num /= 1024.0;
    }
    format!("{num:3.1}{suffix} PB")
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation of the numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Correlate every pair of numeric columns over their jointly present rows.
pub fn correlation(dataset: &Dataset) -> CorrelationMatrix {
    let cols: Vec<(String, Vec<Option<f64>>)> = dataset
        .numeric_columns()
        .map(|c| (c.name.clone(), c.values.iter().map(|v| v.as_f64()).collect()))
        .collect();

    let n = cols.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&cols[i].1, &cols[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        names: cols.into_iter().map(|(name, _)| name).collect(),
        values,
    }
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};

    fn floats(name: &str, vals: &[Option<f64>]) -> Column {
        Column::new(
            name,
            DType::Float64,
            vals.iter()
                .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
                .collect(),
        )
    }

    fn ints(name: &str, vals: &[i64]) -> Column {
        Column::new(name, DType::Int64, vals.iter().map(|&v| Value::Integer(v)).collect())
    }

    #[test]
    fn known_ages_have_exact_mean_min_max() {
        let stats = ColumnStats::from_values(&[20.0, 30.0, 40.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 30.0);
        assert_eq!(stats.min, 20.0);
        assert_eq!(stats.max, 40.0);
        assert_eq!(stats.median, 30.0);
        assert_eq!(stats.q25, 25.0);
        assert_eq!(stats.q75, 35.0);
        assert_eq!(stats.std, 10.0);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let stats = ColumnStats::from_values(&[5.0]);
        assert!(stats.std.is_nan());
        assert_eq!(stats.q25, 5.0);
    }

    #[test]
    fn distinct_count_ignores_duplicates() {
        let ds = Dataset::from_columns(vec![ints("x", &[1, 1, 2, 3])]).unwrap();
        assert_eq!(nunique(&ds).get("x"), Some(3));
    }

    #[test]
    fn describe_skips_non_numeric_and_missing() {
        let ds = Dataset::from_columns(vec![
            floats("Age", &[Some(20.0), None, Some(30.0), Some(40.0)]),
            Column::new(
                "Name",
                DType::Object,
                vec![
                    Value::String("a".into()),
                    Value::String("b".into()),
                    Value::String("c".into()),
                    Value::String("d".into()),
                ],
            ),
        ])
        .unwrap();
        let table = describe(&ds);
        assert_eq!(table.column_names(), vec!["Age"]);
        assert_eq!(table.cell("count", "Age"), Some("3.000000"));
        assert_eq!(table.cell("mean", "Age"), Some("30.000000"));
        assert_eq!(table.cell("max", "Age"), Some("40.000000"));
    }

    #[test]
    fn table_render_aligns_and_folds() {
        let mut table = TextTable::new(vec!["count".into(), "mean".into()]);
        table.push_column("A".into(), vec!["1.000000".into(), "2.500000".into()]);
        table.push_column("LongName".into(), vec!["3.000000".into(), "4.000000".into()]);

        let full = table.to_string();
        let lines: Vec<&str> = full.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "count  1.000000  3.000000");
        assert!(lines[0].ends_with("  LongName"));

        let folded = table.render(20);
        assert_eq!(folded.split("\n\n").count(), 2);
    }

    #[test]
    fn unique_counts_render_right_aligned() {
        let counts = UniqueCounts(vec![("PassengerId".into(), 891), ("Sex".into(), 2)]);
        assert_eq!(counts.to_string(), "PassengerId    891\nSex              2");
    }

    #[test]
    fn info_lists_columns_and_dtypes() {
        let ds = Dataset::from_columns(vec![
            ints("PassengerId", &[1, 2]),
            floats("Age", &[Some(22.0), None]),
        ])
        .unwrap();
        let text = info(&ds);
        assert!(text.starts_with("RangeIndex: 2 entries, 0 to 1\n"));
        assert!(text.contains("Data columns (total 2 columns):"));
        assert!(text.contains("Age"));
        assert!(text.contains("1 non-null"));
        assert!(text.contains("dtypes: float64(1), int64(1)"));
        assert!(text.ends_with("memory usage: 160.0 bytes"));
    }

    #[test]
    fn correlation_uses_pairwise_complete_rows() {
        let ds = Dataset::from_columns(vec![
            floats("a", &[Some(1.0), Some(2.0), Some(3.0), None]),
            floats("b", &[Some(2.0), Some(4.0), Some(6.0), Some(100.0)]),
            floats("c", &[Some(3.0), Some(2.0), Some(1.0), Some(0.0)]),
            floats("k", &[Some(1.0), Some(1.0), Some(1.0), Some(1.0)]),
        ])
        .unwrap();
        let corr = correlation(&ds);
        assert_eq!(corr.len(), 4);
        assert!((corr.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((corr.get(0, 2) + 1.0).abs() < 1e-12);
        assert_eq!(corr.get(1, 0), corr.get(0, 1));
        assert!(corr.get(3, 0).is_nan());
    }
}
