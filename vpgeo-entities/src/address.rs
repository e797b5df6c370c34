use itertools::Itertools;

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub name         : Option<String>,
    pub house_number : Option<String>,
    pub street       : Option<String>,
    pub zip          : Option<String>,
    pub city         : Option<String>,
    pub state        : Option<String>,
    pub country      : Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.house_number.is_none()
            && self.street.is_none()
            && self.zip.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }

    /// Short human readable label: name, city, street and country.
    ///
    /// Blank parts are skipped.
    pub fn label(&self) -> String {
        [&self.name, &self.city, &self.street, &self.country]
            .into_iter()
            .filter_map(|x| x.as_deref())
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_of_partial_address() {
        let mut addr = Address {
            name: Some("Tokyo Tower".into()),
            city: Some("Tokyo".into()),
            ..Default::default()
        };
        assert_eq!("Tokyo Tower, Tokyo", addr.label());
        addr.country = Some("Japan".into());
        assert_eq!("Tokyo Tower, Tokyo, Japan", addr.label());
        addr.name = None;
        addr.street = Some(" ".into());
        assert_eq!("Tokyo, Japan", addr.label());
    }
}
