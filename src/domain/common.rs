/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a time-based identifier from a millisecond timestamp.
///
/// Collisions with identifiers already in use are resolved by bumping the
/// value until it is free, so the result keeps sorting with creation time.
pub fn time_based_id(millis: i64, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = millis;
    loop {
        let id = candidate.to_string();
        if !taken(&id) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_based_id_uses_millis() {
        assert_eq!(time_based_id(1_714_550_400_000, |_| false), "1714550400000");
    }

    #[test]
    fn time_based_id_skips_taken_values() {
        let taken = ["1000", "1001"];
        let id = time_based_id(1000, |candidate| taken.contains(&candidate));
        assert_eq!(id, "1002");
    }
}
