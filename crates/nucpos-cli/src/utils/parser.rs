use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Invalid mechanical model format for '{0}'. Expected 'model@temperature' (e.g., 'crick@310')."
    )]
    InvalidModelFormat(String),

    #[error("Invalid insertion site '{0}'. Expected 'chromosome:cut-site' (e.g., 'chr2L:1000000').")]
    InvalidSite(String),

    #[error("Component '{component}' cannot be empty in '{name}'.")]
    EmptyComponent {
        component: &'static str,
        name: String,
    },
}

/// A mechanical model addressed as `model@temperature`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    pub model: String,
    pub temperature: String,
}

pub fn parse_model_name(name: &str) -> Result<ModelName, ParseError> {
    let (model, temperature) = name
        .split_once('@')
        .ok_or_else(|| ParseError::InvalidModelFormat(name.to_string()))?;
    if temperature.contains('@') {
        return Err(ParseError::InvalidModelFormat(name.to_string()));
    }
    if model.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "model",
            name: name.to_string(),
        });
    }
    if temperature.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "temperature",
            name: name.to_string(),
        });
    }
    Ok(ModelName {
        model: model.to_string(),
        temperature: temperature.to_string(),
    })
}

/// A genomic cut site addressed as `chromosome:position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteName {
    pub chromosome: String,
    pub cut_site: u64,
}

pub fn parse_site(site: &str) -> Result<SiteName, ParseError> {
    let (chromosome, position) = site
        .rsplit_once(':')
        .ok_or_else(|| ParseError::InvalidSite(site.to_string()))?;
    if chromosome.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "chromosome",
            name: site.to_string(),
        });
    }
    let cut_site = position
        .replace('_', "")
        .parse()
        .map_err(|_| ParseError::InvalidSite(site.to_string()))?;
    Ok(SiteName {
        chromosome: chromosome.to_string(),
        cut_site,
    })
}
