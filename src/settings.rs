//! Settings
//!
//! Organisation, user and notification preferences. These are single documents rather than
//! registers, so they are validated and replaced wholesale.

use tracing::info;

use crate::validation::{FieldRule, FieldValue, FormSchema, Rule, ValidationErrors, validate};

/// Shown after the company settings are saved.
pub const COMPANY_SAVED: &str = "Configurações da empresa atualizadas com sucesso!";

/// Shown after the user settings are saved.
pub const USER_SAVED: &str = "Configurações do usuário atualizadas com sucesso!";

/// Shown after the notification settings are saved.
pub const NOTIFICATIONS_SAVED: &str = "Configurações de notificação atualizadas com sucesso!";

/// Organisation details printed on documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySettingsForm {
    /// Organisation name.
    pub company_name: String,

    /// CNPJ.
    pub cnpj: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// State abbreviation.
    pub state: String,

    /// Postal code.
    pub cep: String,

    /// Phone number.
    pub phone: String,

    /// Contact email.
    pub email: String,

    /// Website.
    pub website: String,

    /// Logo location.
    pub logo: String,
}

impl Default for CompanySettingsForm {
    fn default() -> Self {
        Self {
            company_name: "Prefeitura Municipal de Exemplo".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            address: "Av. Principal, 1000".to_string(),
            city: "Cidade Exemplo".to_string(),
            state: "EX".to_string(),
            cep: "12345-678".to_string(),
            phone: "(11) 1234-5678".to_string(),
            email: "contato@prefeituraexemplo.gov.br".to_string(),
            website: "www.prefeituraexemplo.gov.br".to_string(),
            logo: String::new(),
        }
    }
}

const COMPANY_RULES: &[FieldRule] = &[
    FieldRule::new(
        "company_name",
        Rule::Required { min_len: 1 },
        "Nome da empresa é obrigatório",
    ),
    FieldRule::new(
        "cnpj",
        Rule::Required { min_len: 14 },
        "CNPJ deve ter pelo menos 14 caracteres",
    ),
    FieldRule::new("address", Rule::Required { min_len: 1 }, "Endereço é obrigatório"),
    FieldRule::new("city", Rule::Required { min_len: 1 }, "Cidade é obrigatória"),
    FieldRule::new("state", Rule::Required { min_len: 2 }, "Estado é obrigatório"),
    FieldRule::new(
        "cep",
        Rule::Required { min_len: 8 },
        "CEP deve ter pelo menos 8 caracteres",
    ),
    FieldRule::new(
        "phone",
        Rule::Required { min_len: 10 },
        "Telefone deve ter pelo menos 10 caracteres",
    ),
    FieldRule::new("email", Rule::Email, "Email inválido"),
    FieldRule::new("website", Rule::Optional, ""),
    FieldRule::new("logo", Rule::Optional, ""),
];

impl FormSchema for CompanySettingsForm {
    fn rules() -> &'static [FieldRule] {
        COMPANY_RULES
    }

    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let text = match field {
            "company_name" => &self.company_name,
            "cnpj" => &self.cnpj,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "cep" => &self.cep,
            "phone" => &self.phone,
            "email" => &self.email,
            "website" => &self.website,
            "logo" => &self.logo,
            _ => return None,
        };

        Some(FieldValue::Text(text))
    }
}

/// Profile and password change for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettingsForm {
    /// Display name.
    pub name: String,

    /// Email.
    pub email: String,

    /// Current password, required to save.
    pub current_password: String,

    /// New password; empty keeps the current one.
    pub new_password: String,

    /// Repeats `new_password`.
    pub confirm_password: String,
}

impl Default for UserSettingsForm {
    fn default() -> Self {
        Self {
            name: "Administrador".to_string(),
            email: "admin@prefeituraexemplo.gov.br".to_string(),
            current_password: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
        }
    }
}

const USER_RULES: &[FieldRule] = &[
    FieldRule::new("name", Rule::Required { min_len: 1 }, "Nome é obrigatório"),
    FieldRule::new("email", Rule::Email, "Email inválido"),
    FieldRule::new(
        "current_password",
        Rule::Required { min_len: 6 },
        "Senha atual deve ter pelo menos 6 caracteres",
    ),
    FieldRule::new(
        "new_password",
        Rule::OptionalMinLength { min_len: 6 },
        "Nova senha deve ter pelo menos 6 caracteres",
    ),
    FieldRule::new(
        "confirm_password",
        Rule::MatchesWhenPresent {
            companion: "new_password",
        },
        "As senhas não coincidem",
    ),
];

impl FormSchema for UserSettingsForm {
    fn rules() -> &'static [FieldRule] {
        USER_RULES
    }

    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let text = match field {
            "name" => &self.name,
            "email" => &self.email,
            "current_password" => &self.current_password,
            "new_password" => &self.new_password,
            "confirm_password" => &self.confirm_password,
            _ => return None,
        };

        Some(FieldValue::Text(text))
    }
}

/// Which events send a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Independent on/off preferences"
)]
pub struct NotificationSettings {
    /// Send notifications by email.
    pub email_notifications: bool,

    /// A new bidding process was registered.
    pub new_bidding_processes: bool,

    /// A bidding process changed status.
    pub bidding_status_changes: bool,

    /// A contract is about to expire.
    pub contract_expirations: bool,

    /// A penalty was applied or closed.
    pub penalty_updates: bool,

    /// The system was updated.
    pub system_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            new_bidding_processes: true,
            bidding_status_changes: true,
            contract_expirations: true,
            penalty_updates: true,
            system_updates: false,
        }
    }
}

/// Saved settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    company: CompanySettingsForm,
    user: UserSettingsForm,
    notifications: NotificationSettings,
}

impl Settings {
    /// Organisation details.
    pub fn company(&self) -> &CompanySettingsForm {
        &self.company
    }

    /// User profile; password fields are never kept.
    pub fn user(&self) -> &UserSettingsForm {
        &self.user
    }

    /// Notification preferences.
    pub fn notifications(&self) -> NotificationSettings {
        self.notifications
    }

    /// Validate and save the organisation details.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; nothing is saved.
    pub fn save_company(
        &mut self,
        form: CompanySettingsForm,
    ) -> Result<&'static str, ValidationErrors> {
        validate(&form)?;

        self.company = form;

        info!("company settings saved");

        Ok(COMPANY_SAVED)
    }

    /// Validate and save the user profile, discarding the password fields.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; nothing is saved.
    pub fn save_user(&mut self, form: UserSettingsForm) -> Result<&'static str, ValidationErrors> {
        validate(&form)?;

        let password_changed = !form.new_password.is_empty();

        self.user = UserSettingsForm {
            name: form.name,
            email: form.email,
            ..UserSettingsForm::default()
        };

        info!(password_changed, "user settings saved");

        Ok(USER_SAVED)
    }

    /// Save the notification preferences.
    pub fn save_notifications(&mut self, notifications: NotificationSettings) -> &'static str {
        self.notifications = notifications;

        info!("notification settings saved");

        NOTIFICATIONS_SAVED
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn user_form() -> UserSettingsForm {
        UserSettingsForm {
            current_password: "segredo".to_string(),
            ..UserSettingsForm::default()
        }
    }

    #[test]
    fn defaults_are_valid_company_settings() -> TestResult {
        validate(&CompanySettingsForm::default())?;

        Ok(())
    }

    #[test]
    fn company_name_is_required() {
        let mut settings = Settings::default();

        let result = settings.save_company(CompanySettingsForm {
            company_name: String::new(),
            ..CompanySettingsForm::default()
        });

        let errors = result.err().unwrap_or_default();

        assert_eq!(
            errors.get("company_name"),
            Some("Nome da empresa é obrigatório")
        );
        assert_eq!(settings.company(), &CompanySettingsForm::default());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let form = UserSettingsForm {
            new_password: "novasenha".to_string(),
            confirm_password: "outrasenha".to_string(),
            ..user_form()
        };

        let errors = validate(&form).err().unwrap_or_default();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["confirm_password"]);
        assert_eq!(errors.get("confirm_password"), Some("As senhas não coincidem"));
    }

    #[test]
    fn short_current_password_is_rejected() {
        let form = UserSettingsForm {
            current_password: "123".to_string(),
            ..user_form()
        };

        let errors = validate(&form).err().unwrap_or_default();

        assert_eq!(
            errors.get("current_password"),
            Some("Senha atual deve ter pelo menos 6 caracteres")
        );
    }

    #[test]
    fn saved_user_drops_passwords() -> TestResult {
        let mut settings = Settings::default();

        let message = settings.save_user(UserSettingsForm {
            name: "Ana Pereira".to_string(),
            new_password: "novasenha".to_string(),
            confirm_password: "novasenha".to_string(),
            ..user_form()
        })?;

        assert_eq!(message, USER_SAVED);
        assert_eq!(settings.user().name, "Ana Pereira");
        assert!(settings.user().current_password.is_empty());
        assert!(settings.user().new_password.is_empty());

        Ok(())
    }

    #[test]
    fn notification_defaults_skip_system_updates() {
        let mut settings = Settings::default();

        assert!(settings.notifications().email_notifications);
        assert!(!settings.notifications().system_updates);

        let message = settings.save_notifications(NotificationSettings {
            system_updates: true,
            ..NotificationSettings::default()
        });

        assert_eq!(message, NOTIFICATIONS_SAVED);
        assert!(settings.notifications().system_updates);
    }
}
