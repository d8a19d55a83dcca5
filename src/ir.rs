// Figure description shared by the compiler and the renderers

// =============================================================================
// Figure
// =============================================================================

/// A grid of facet cells, ready for a renderer. Renderers read this and
/// nothing else, so the same figure always renders the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Log base per axis, 0 for linear
    pub log_x: u32,
    pub log_y: u32,
    /// Confidence level of the ranges, e.g. 0.95
    pub confidence: f64,
    /// Cells in column-major order
    pub cells: Vec<Cell>,
}

impl Figure {
    /// Whether the figure needs more than one cell.
    pub fn is_multiplot(&self) -> bool {
        self.n_rows > 1 || self.n_cols > 1
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.cells.iter().filter_map(|c| c.panel.as_ref())
    }
}

/// One facet position. Empty positions have no panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub panel: Option<Panel>,
}

// =============================================================================
// Panels and series
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub row_label: String,
    pub col_label: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Panel {
    /// Whether any series in the panel has a confidence range.
    pub fn any_range(&self) -> bool {
        self.series.iter().any(Series::has_range)
    }
}

/// The points of a single color within a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// 1-based color slot, stable across panels
    pub color: usize,
    pub title: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn has_range(&self) -> bool {
        self.points.iter().any(|p| p.range.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    /// Confidence interval of `y`, if one could be computed
    pub range: Option<(f64, f64)>,
}
