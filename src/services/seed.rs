use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::PasswordVerifier,
    errors::AppResult,
    models::domain::{NewQuestion, Role, User},
    repositories::{QuestionRepository, UserRepository},
};

const SEED_USERS: &[(&str, &[Role])] = &[
    ("admin", &[Role::Admin, Role::User]),
    ("user", &[Role::User]),
];

/// Creates the `admin` and `user` accounts when they do not exist yet.
/// Returns how many were created.
pub async fn seed_users(
    users: &dyn UserRepository,
    passwords: &dyn PasswordVerifier,
    password: &SecretString,
) -> AppResult<usize> {
    let mut created = 0;

    for (username, roles) in SEED_USERS {
        if users.find_by_username(username).await?.is_some() {
            continue;
        }

        let hash = passwords.hash(password.expose_secret())?;
        users.create(User::new(username, &hash, roles)).await?;
        log::info!("Seeded user '{}'", username);
        created += 1;
    }

    Ok(created)
}

/// Reads the seed file. An unreadable or invalid file yields no questions.
pub fn load_seed_questions(path: &Path) -> Vec<NewQuestion> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Could not read seed questions from {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(questions) => questions,
        Err(e) => {
            log::warn!("Could not parse seed questions in {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Loads the seed file into an empty question store.
pub async fn seed_questions(questions: &dyn QuestionRepository, path: &Path) -> AppResult<usize> {
    if questions.count().await? > 0 {
        return Ok(0);
    }

    let seed = load_seed_questions(path);
    let total = seed.len();
    for question in seed {
        questions.create(question).await?;
    }

    if total > 0 {
        log::info!("Seeded {} questions from {}", total, path.display());
    }
    Ok(total)
}
