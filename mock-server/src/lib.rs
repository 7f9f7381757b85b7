//! In-memory implementation of the pets and users REST API.
//!
//! Pets reference their owner by id. Every pet returned to a client has the
//! owner document populated, the way the form expects it when editing.

pub mod config;
pub mod error;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::{ServerError, Violation, Violations};

const NAME_MIN_LEN: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// A pet as returned by the API, owner populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: Option<User>,
}

/// Body of `POST /api/pets` and `PUT /api/pets/{id}`. Missing fields read as
/// empty so they surface as validation errors instead of extractor errors.
#[derive(Debug, Default, Deserialize)]
pub struct PetInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub owner: String,
}

#[derive(Clone, Debug)]
struct PetRecord {
    id: Uuid,
    name: String,
    kind: String,
    owner: Uuid,
}

#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
    pets: Vec<PetRecord>,
}

impl Store {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn populate(&self, record: &PetRecord) -> Pet {
        Pet {
            id: record.id,
            name: record.name.clone(),
            kind: record.kind.clone(),
            owner: self.user(record.owner).cloned(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/pets/{id}", get(get_pet).put(update_pet).delete(delete_pet))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate_user(input: &NewUser) -> Result<(), ServerError> {
    let mut violations = Violations::new();
    for (path, value, label) in [
        ("first_name", &input.first_name, "First name"),
        ("last_name", &input.last_name, "Last name"),
    ] {
        if value.trim().is_empty() {
            violate(&mut violations, path, "required", format!("{label} is required"));
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServerError::Validation(violations))
    }
}

fn violate(violations: &mut Violations, path: &str, kind: &str, message: impl Into<String>) {
    violations.insert(path.to_string(), Violation::new(path, kind, message));
}

/// Checks every field and returns the owner id when all of them pass.
fn validate_pet(store: &Store, input: &PetInput) -> Result<Uuid, ServerError> {
    let mut violations = Violations::new();

    let name = input.name.trim();
    if name.is_empty() {
        violate(&mut violations, "name", "required", "Pet name is required");
    } else if name.chars().count() < NAME_MIN_LEN {
        let message = format!("Pet name must be at least {NAME_MIN_LEN} characters long");
        violate(&mut violations, "name", "minlength", message);
    }

    if input.kind.trim().is_empty() {
        violate(&mut violations, "type", "required", "Pet type is required");
    }

    let owner = if input.owner.is_empty() {
        violate(&mut violations, "owner", "required", "Path `owner` is required.");
        None
    } else {
        match input.owner.parse::<Uuid>() {
            Ok(id) if store.user(id).is_some() => Some(id),
            Ok(_) => {
                violate(&mut violations, "owner", "exists", "Owner does not exist");
                None
            }
            Err(_) => {
                let message =
                    format!("Cast to UUID failed for value \"{}\" at path \"owner\"", input.owner);
                violate(&mut violations, "owner", "cast", message);
                None
            }
        }
    };

    match owner {
        Some(owner) if violations.is_empty() => Ok(owner),
        _ => Err(ServerError::Validation(violations)),
    }
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    Json(db.read().await.users.clone())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    validate_user(&input)?;
    let user = User {
        id: Uuid::new_v4(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
    };
    db.write().await.users.push(user.clone());
    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_pets(State(db): State<Db>) -> Json<Vec<Pet>> {
    let store = db.read().await;
    Json(store.pets.iter().map(|record| store.populate(record)).collect())
}

async fn get_pet(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Pet>, ServerError> {
    let store = db.read().await;
    store
        .pets
        .iter()
        .find(|record| record.id == id)
        .map(|record| Json(store.populate(record)))
        .ok_or(ServerError::NotFound("pet"))
}

async fn create_pet(
    State(db): State<Db>,
    Json(input): Json<PetInput>,
) -> Result<(StatusCode, Json<Pet>), ServerError> {
    let mut store = db.write().await;
    let owner = validate_pet(&store, &input)?;
    let record = PetRecord {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        kind: input.kind.trim().to_string(),
        owner,
    };
    let pet = store.populate(&record);
    store.pets.push(record);
    tracing::info!(pet_id = %pet.id, "pet created");
    Ok((StatusCode::CREATED, Json(pet)))
}

async fn update_pet(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<PetInput>,
) -> Result<Json<Pet>, ServerError> {
    let mut store = db.write().await;
    if !store.pets.iter().any(|record| record.id == id) {
        return Err(ServerError::NotFound("pet"));
    }
    let owner = validate_pet(&store, &input)?;
    let record = store
        .pets
        .iter_mut()
        .find(|record| record.id == id)
        .ok_or(ServerError::NotFound("pet"))?;
    record.name = input.name.trim().to_string();
    record.kind = input.kind.trim().to_string();
    record.owner = owner;
    let record = record.clone();
    tracing::info!(pet_id = %id, "pet updated");
    Ok(Json(store.populate(&record)))
}

async fn delete_pet(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, ServerError> {
    let mut store = db.write().await;
    let index = store
        .pets
        .iter()
        .position(|record| record.id == id)
        .ok_or(ServerError::NotFound("pet"))?;
    store.pets.remove(index);
    tracing::info!(pet_id = %id, "pet deleted");
    Ok(StatusCode::NO_CONTENT)
}
