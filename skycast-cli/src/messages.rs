use skycast_core::MessageCatalog;

/// English display text for the error taxonomy. The core never hardcodes
/// user-facing strings; it renders through this catalog.
pub struct CliMessages;

impl MessageCatalog for CliMessages {
    fn empty_query(&self) -> String {
        "Please enter a city name.".to_string()
    }

    fn city_not_found(&self, city: &str) -> String {
        format!("No city named '{city}' was found. Check the spelling and try again.")
    }

    fn unauthorized(&self) -> String {
        "The provider rejected the configured API key.\n\
         Hint: run `skycast configure` and enter a valid OpenWeatherMap key."
            .to_string()
    }

    fn network_failure(&self) -> String {
        "Could not reach the weather service. Check your connection and try again.".to_string()
    }
}
