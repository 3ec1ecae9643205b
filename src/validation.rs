// Entity validation shared by every storage backend

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{AppError, AppResult};
use crate::models::{FilmRequest, UserRequest, ValidFilm, ValidUser};

pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// First public film screening; no release date may precede it.
pub const EARLIEST_RELEASE: (i32, u32, u32) = (1895, 12, 28);

/// Turns raw payloads into normalized records or rejects them.
pub trait EntityValidator: Send + Sync {
    fn validate_user(&self, request: &UserRequest) -> AppResult<ValidUser>;
    fn validate_film(&self, request: &FilmRequest) -> AppResult<ValidFilm>;
}

#[derive(Debug, Clone, Default)]
pub struct StandardValidator {
    /// Overrides the local date used for the birthday check.
    today: Option<NaiveDate>,
}

impl StandardValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl EntityValidator for StandardValidator {
    fn validate_user(&self, request: &UserRequest) -> AppResult<ValidUser> {
        let email = match request.email.as_deref() {
            Some(email) if !email.contains(' ') && email.contains('@') => email.to_string(),
            _ => {
                return Err(AppError::Validation(
                    "The user email must include @, should be without spaces and shouldn't be blank"
                        .to_string(),
                ))
            }
        };

        let login = match request.login.as_deref() {
            Some(login) if !login.is_empty() && !login.contains(' ') => login.to_string(),
            _ => {
                return Err(AppError::Validation(
                    "The user login can't be empty or contain spaces".to_string(),
                ))
            }
        };

        let name = match request.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => login.clone(),
        };

        let today = self.today();
        let birthday = match request.birthday {
            Some(birthday) if birthday <= today => birthday,
            Some(_) => {
                return Err(AppError::Validation(format!(
                    "The user birthday can't be after {}",
                    today
                )))
            }
            None => {
                return Err(AppError::Validation(
                    "The user birthday is required".to_string(),
                ))
            }
        };

        Ok(ValidUser {
            email,
            login,
            name,
            birthday,
        })
    }

    fn validate_film(&self, request: &FilmRequest) -> AppResult<ValidFilm> {
        let name = match request.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Err(AppError::Validation("The film name should be added".to_string())),
        };

        let description = match request.description.as_deref() {
            Some(description) if description.trim().is_empty() => {
                return Err(AppError::Validation(
                    "The film description can't be empty".to_string(),
                ))
            }
            Some(description) if description.chars().count() > MAX_DESCRIPTION_CHARS => {
                return Err(AppError::Validation(format!(
                    "The film description should be at most {} characters",
                    MAX_DESCRIPTION_CHARS
                )))
            }
            Some(description) => description.to_string(),
            None => {
                return Err(AppError::Validation(
                    "The film description can't be empty".to_string(),
                ))
            }
        };

        let release_date = match request.release_date {
            Some(date) if (date.year(), date.month(), date.day()) >= EARLIEST_RELEASE => date,
            _ => {
                let (year, month, day) = EARLIEST_RELEASE;
                return Err(AppError::Validation(format!(
                    "The release date should be on or after {:04}-{:02}-{:02}",
                    year, month, day
                )));
            }
        };

        let duration = match request.duration {
            Some(duration) if duration >= 1 => duration,
            _ => {
                return Err(AppError::Validation(
                    "Film duration should be positive".to_string(),
                ))
            }
        };

        let mpa_id = request
            .mpa
            .map(|mpa| mpa.id)
            .ok_or_else(|| AppError::Validation("MPA rating is not provided".to_string()))?;

        Ok(ValidFilm {
            name,
            description,
            release_date,
            duration,
            mpa_id,
        })
    }
}
