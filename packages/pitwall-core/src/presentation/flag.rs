//! Country flag image URLs

const FLAG_BASE_URL: &str = "https://purecatamphetamine.github.io/country-flag-icons/3x2";

/// Flag image URL for a country code
///
/// The code is inserted as given; an empty or unknown code still yields a
/// URL, it just will not point at an existing image.
pub fn flag_url(country_code: &str) -> String {
    format!("{FLAG_BASE_URL}/{country_code}.svg")
}
