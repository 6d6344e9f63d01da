//! Offset/limit pagination shared by the list queries

/// Apply `offset` then `limit` to an already ordered result set
pub fn paginate<T>(items: Vec<T>, offset: Option<usize>, limit: Option<usize>) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.unwrap_or(0))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// SQL `LIMIT` value, where -1 means unbounded
pub fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map(clamp).unwrap_or(-1)
}

/// SQL `OFFSET` value
pub fn sql_offset(offset: Option<usize>) -> i64 {
    clamp(offset.unwrap_or(0))
}

/// Saturate at `i64::MAX`; SQLite reads a negative offset as zero
fn clamp(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..10).collect();

        assert_eq!(paginate(items.clone(), None, None).len(), 10);
        assert_eq!(paginate(items.clone(), Some(2), Some(3)), vec![2, 3, 4]);
        assert_eq!(paginate(items.clone(), Some(8), Some(5)), vec![8, 9]);
        assert!(paginate(items, Some(20), None).is_empty());
    }

    #[test]
    fn test_sql_bounds() {
        assert_eq!(sql_limit(None), -1);
        assert_eq!(sql_limit(Some(5)), 5);
        assert_eq!(sql_offset(None), 0);
        assert_eq!(sql_offset(Some(3)), 3);
    }

    #[test]
    fn test_sql_bounds_saturate() {
        assert_eq!(sql_limit(Some(usize::MAX)), i64::MAX);
        assert_eq!(sql_offset(Some(usize::MAX)), i64::MAX);
        assert!(paginate(vec![1, 2, 3], Some(usize::MAX), None).is_empty());
    }
}
