use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self { skip, limit }
    }

    /// Offset and page size, clamped to `0..` and `1..=100`.
    pub fn bounds(&self) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(100).clamp(1, 100);
        (skip, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_clamped() {
        assert_eq!(ListQuery::default().bounds(), (0, 100));
        assert_eq!(ListQuery::new(Some(-5), Some(0)).bounds(), (0, 1));
        assert_eq!(ListQuery::new(Some(20), Some(500)).bounds(), (20, 100));
    }
}
