/// Inline error shown under the company URL field.
pub const INVALID_URL: &str = "Please enter a valid URL.";
/// Inline error shown under the drug name field.
pub const DRUG_NAME_REQUIRED: &str = "Drug / product name is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CompanyUrl,
    DrugName,
    TrialsPapers,
    DoctorTypes,
}

impl Field {
    /// Stable identifier, matching the JSON key sent to the backend.
    pub fn id(self) -> &'static str {
        match self {
            Field::CompanyUrl => "companyUrl",
            Field::DrugName => "drugName",
            Field::TrialsPapers => "trialsPapers",
            Field::DoctorTypes => "doctorTypes",
        }
    }
}

/// Editable value of one form field plus its inline validation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldState {
    pub value: String,
    error: Option<&'static str>,
}

impl FieldState {
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    fn mark(&mut self, error: Option<&'static str>) {
        self.error = error;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    pub company_url: FieldState,
    pub drug_name: FieldState,
    pub trials_papers: FieldState,
    pub doctor_types: FieldState,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &FieldState {
        match field {
            Field::CompanyUrl => &self.company_url,
            Field::DrugName => &self.drug_name,
            Field::TrialsPapers => &self.trials_papers,
            Field::DoctorTypes => &self.doctor_types,
        }
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        match field {
            Field::CompanyUrl => self.company_url.value = value,
            Field::DrugName => self.drug_name.value = value,
            Field::TrialsPapers => self.trials_papers.value = value,
            Field::DoctorTypes => self.doctor_types.value = value,
        }
    }

    /// Snapshot of the trimmed field values.
    pub fn capture(&self) -> FormInput {
        FormInput {
            company_url: self.company_url.value.trim().to_string(),
            drug_name: self.drug_name.value.trim().to_string(),
            trials_papers: self.trials_papers.value.trim().to_string(),
            doctor_types: self.doctor_types.value.trim().to_string(),
        }
    }

    /// Fields currently carrying an inline error, in form order.
    pub fn errors(&self) -> Vec<(Field, &'static str)> {
        [Field::CompanyUrl, Field::DrugName]
            .into_iter()
            .filter_map(|field| self.get(field).error().map(|msg| (field, msg)))
            .collect()
    }
}

/// Request captured from the form at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub company_url: String,
    pub drug_name: String,
    pub trials_papers: String,
    pub doctor_types: String,
}

/// Checks the company URL and drug name, setting or clearing each field's
/// inline error. Returns true only when both pass.
pub fn validate(fields: &mut FormFields) -> bool {
    let url_ok = is_valid_url(&fields.company_url.value);
    fields
        .company_url
        .mark((!url_ok).then_some(INVALID_URL));

    let drug_ok = !fields.drug_name.value.trim().is_empty();
    fields
        .drug_name
        .mark((!drug_ok).then_some(DRUG_NAME_REQUIRED));

    url_ok && drug_ok
}

fn is_valid_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && url::Url::parse(trimmed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(url: &str, drug: &str) -> FormFields {
        let mut fields = FormFields::default();
        fields.set(Field::CompanyUrl, url.to_string());
        fields.set(Field::DrugName, drug.to_string());
        fields
    }

    #[test]
    fn accepts_absolute_url_and_drug() {
        let mut f = fields(" https://acme.example/pipeline ", "Zentra");
        assert!(validate(&mut f));
        assert!(f.errors().is_empty());
    }

    #[test]
    fn relative_or_empty_url_is_invalid() {
        for url in ["", "   ", "acme.example", "/about"] {
            let mut f = fields(url, "Zentra");
            assert!(!validate(&mut f), "{url:?} should be rejected");
            assert_eq!(f.company_url.error(), Some(INVALID_URL));
            assert!(!f.drug_name.is_invalid());
        }
    }

    #[test]
    fn passing_field_clears_previous_error() {
        let mut f = fields("nope", " ");
        assert!(!validate(&mut f));
        assert_eq!(f.errors().len(), 2);

        f.set(Field::CompanyUrl, "https://acme.example".into());
        f.set(Field::DrugName, "Zentra".into());
        assert!(validate(&mut f));
        assert!(!f.company_url.is_invalid());
        assert!(!f.drug_name.is_invalid());
    }

    #[test]
    fn capture_trims_every_field() {
        let mut f = fields(" https://acme.example ", " Zentra ");
        f.set(Field::TrialsPapers, "  NCT0001\n".into());
        f.set(Field::DoctorTypes, " oncologists ".into());
        let input = f.capture();
        assert_eq!(input.company_url, "https://acme.example");
        assert_eq!(input.drug_name, "Zentra");
        assert_eq!(input.trials_papers, "NCT0001");
        assert_eq!(input.doctor_types, "oncologists");
    }
}
