use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub title: &'static str,
    pub price: &'static str,
}

/// Public details shown on the salon's landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalonProfile {
    pub name: &'static str,
    pub tagline: &'static str,
    pub about: &'static str,
    pub services: Vec<Service>,
    pub hours: Vec<(&'static str, &'static str)>,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
}

impl Default for SalonProfile {
    fn default() -> Self {
        Self {
            name: "Elegance Salon",
            tagline: "Where style meets sophistication.",
            about: "Founded in 2010, Elegance Salon brings the refined aesthetics and \
                    techniques of European hair styling to your city.",
            services: vec![
                Service {
                    title: "Haircut & Styling",
                    price: "€45+",
                },
                Service {
                    title: "Color & Highlights",
                    price: "€75+",
                },
                Service {
                    title: "Treatment & Care",
                    price: "€60+",
                },
            ],
            hours: vec![
                ("Monday - Saturday", "8AM - 8PM"),
                ("Sunday", "Closed"),
            ],
            address: "123 Elegance Street",
            phone: "+1 234 567 8900",
            email: "info@elegancesalon.com",
        }
    }
}

impl fmt::Display for SalonProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name.to_uppercase())?;
        writeln!(f, "{}", self.tagline)?;
        writeln!(f)?;
        writeln!(f, "Services")?;
        for service in &self.services {
            writeln!(f, "  {:<20} {}", service.title, service.price)?;
        }
        writeln!(f)?;
        writeln!(f, "Hours")?;
        for (days, hours) in &self.hours {
            writeln!(f, "  {}: {}", days, hours)?;
        }
        writeln!(f)?;
        writeln!(f, "Contact")?;
        writeln!(f, "  {}", self.address)?;
        writeln!(f, "  {}", self.phone)?;
        write!(f, "  {}", self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_lists_services_and_hours() {
        let profile = SalonProfile::default();
        assert_eq!(profile.services.len(), 3);
        assert_eq!(profile.services[1].price, "€75+");

        let text = profile.to_string();
        assert!(text.starts_with("ELEGANCE SALON"));
        assert!(text.contains("Sunday: Closed"));
        assert!(text.ends_with("info@elegancesalon.com"));
    }
}
