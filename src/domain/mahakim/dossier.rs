use crate::domain::errors::{DomainError, DomainResult};
use std::fmt;

/// Case number as the portal expects it: `numero/code/annee`, e.g.
/// `1234/8201/2024`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DossierNumber {
    numero: String,
    code_categorie: String,
    annee: i32,
}

impl DossierNumber {
    pub fn new(
        numero: impl Into<String>,
        code_categorie: impl Into<String>,
        annee: i32,
    ) -> DomainResult<Self> {
        let numero = numero.into();
        let code_categorie = code_categorie.into();
        if !is_digits(&numero, 1, 8) {
            return Err(invalid("numero must be 1 to 8 digits"));
        }
        if !is_digits(&code_categorie, 1, 6) {
            return Err(invalid("code categorie must be 1 to 6 digits"));
        }
        if !(1950..=2100).contains(&annee) {
            return Err(invalid("annee is out of range"));
        }
        Ok(Self {
            numero,
            code_categorie,
            annee,
        })
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
        let [numero, code, annee] = parts.as_slice() else {
            return Err(invalid("expected numero/code/annee"));
        };
        let annee = annee
            .parse::<i32>()
            .map_err(|_| invalid("annee must be a year"))?;
        Self::new(*numero, *code, annee)
    }

    pub fn numero(&self) -> &str {
        &self.numero
    }

    pub fn code_categorie(&self) -> &str {
        &self.code_categorie
    }

    pub fn annee(&self) -> i32 {
        self.annee
    }
}

impl fmt::Display for DossierNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.numero, self.code_categorie, self.annee)
    }
}

fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

fn invalid(reason: &str) -> DomainError {
    DomainError::Validation(format!("invalid dossier number: {reason}"))
}
