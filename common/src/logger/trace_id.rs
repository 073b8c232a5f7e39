use uuid::Uuid;

/// Correlation ID that follows one decision request through dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn value(&self) -> String {
        self.0.as_hyphenated().to_string()
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_ids_are_unique() {
        assert_ne!(TraceId::default(), TraceId::default());
    }

    #[test]
    fn value_is_hyphenated() {
        let v = TraceId::default().value();
        assert_eq!(v.len(), 36);
        assert_eq!(v.matches('-').count(), 4);
    }
}
