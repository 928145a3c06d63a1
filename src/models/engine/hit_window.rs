//! Positional tolerance around the judgement line.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    /// Track position of the judgement line.
    pub hit_line: f64,
    /// Half-width of the window. The bound itself is outside.
    pub tolerance: f64,
}

impl HitWindow {
    pub fn new(hit_line: f64, tolerance: f64) -> Self {
        Self {
            hit_line,
            tolerance,
        }
    }

    /// Distance from the line if `position` is inside the window.
    pub fn judge(&self, position: f64) -> Option<f64> {
        let distance = (position - self.hit_line).abs();
        (distance < self.tolerance).then_some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_strict() {
        let window = HitWindow::new(500.0, 50.0);
        assert_eq!(window.judge(480.0), Some(20.0));
        assert_eq!(window.judge(520.0), Some(20.0));
        assert_eq!(window.judge(450.0), None);
        assert_eq!(window.judge(550.0), None);
        assert_eq!(window.judge(0.0), None);
    }
}
