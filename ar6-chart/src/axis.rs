/// Tick label for a categorical axis drawn on a plain `f64` range, where
/// category `i` sits at `i as f64`. Ticks between categories stay blank.
pub fn category_tick_label(labels: &[String], at: f64) -> String {
    let index = at.round();
    if index < 0.0 || (at - index).abs() > 1e-6 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tick_label() {
        let labels = vec!["2030 1.5C".to_string(), "2050 1.5C".to_string()];
        assert_eq!(category_tick_label(&labels, 0.0), "2030 1.5C");
        assert_eq!(category_tick_label(&labels, 1.0 + 1e-9), "2050 1.5C");
        assert_eq!(category_tick_label(&labels, 0.5), "");
        assert_eq!(category_tick_label(&labels, -1.0), "");
        assert_eq!(category_tick_label(&labels, 2.0), "");
    }
}
