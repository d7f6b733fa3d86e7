/// Hand-written reading of each chart, keyed by its file name.
const OBSERVATIONS: [(&str, &str); 7] = [
    (
        "pairplot.png",
        "The pairplot shows that survivors tended to pay higher fares and were slightly younger on average.",
    ),
    (
        "heatmap.png",
        "The heatmap shows Fare and Pclass are moderately correlated (-0.55), Survived is positively correlated with Fare, and negatively with Pclass.",
    ),
    (
        "Age_hist.png",
        "The Age histogram shows most passengers were between 20-40 years old, with a small peak for young children.",
    ),
    (
        "Fare_hist.png",
        "The Fare histogram is right-skewed, with most fares under 100 but a few extreme outliers.",
    ),
    (
        "Age_box.png",
        "Survivors and non-survivors had similar median ages, but survivors had more younger passengers.",
    ),
    (
        "Fare_box.png",
        "Survivors generally paid higher fares compared to non-survivors.",
    ),
    (
        "scatter.png",
        "Survivors are more concentrated in the higher fare range, especially among younger passengers.",
    ),
];

/// Caption for a chart file, or the empty string when none is registered.
pub fn caption_for(file_name: &str) -> &'static str {
    OBSERVATIONS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, caption)| *caption)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::PlotKind;

    #[test]
    fn every_chart_has_a_caption() {
        for kind in PlotKind::ALL {
            assert!(!caption_for(kind.file_name()).is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn unknown_file_has_empty_caption() {
        assert_eq!(caption_for("violin.png"), "");
    }
}
