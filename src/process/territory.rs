/// Sales territory for a sanitized country name, if the country is one the
/// business maps. Matching is exact and case-sensitive.
pub fn resolve_territory(country: &str) -> Option<&'static str> {
    match country {
        "USA" => Some("NA"),
        "France" | "Germany" | "UK" | "Spain" => Some("EMEA"),
        "Australia" | "Japan" => Some("APAC"),
        _ => None,
    }
}
