//! Database seeder for SK Ledger development and testing.
//!
//! Seeds a handful of barangays, one main admin, and one SK chairman per
//! barangay, then prints a development token for each actor. Running it
//! twice is harmless: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use skledger_core::authz::{Actor, ActorRole};
use skledger_db::ActorRepository;
use skledger_db::entities::tenants;
use skledger_shared::types::TenantId;
use skledger_shared::{AppConfig, JwtConfig, JwtService};

const BARANGAYS: &[(&str, &str)] = &[
    ("Barangay Poblacion", "POB"),
    ("Barangay San Isidro", "SIS"),
    ("Barangay Santo Niño", "STN"),
];

const MAIN_ADMIN_EMAIL: &str = "admin@skledger.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = skledger_db::connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let actors = ActorRepository::new(db.clone());

    println!("Seeding barangays...");
    let mut tenant_ids = Vec::with_capacity(BARANGAYS.len());
    for (name, code) in BARANGAYS {
        tenant_ids.push((seed_tenant(&db, name, code).await?, *code));
    }

    println!("Seeding main admin...");
    let admin = seed_actor(
        &actors,
        "Main Admin",
        MAIN_ADMIN_EMAIL,
        ActorRole::MainAdmin,
        None,
    )
    .await?;
    let mut seeded = vec![admin];

    println!("Seeding SK chairmen...");
    for (tenant_id, code) in tenant_ids {
        let email = format!("chairman.{}@skledger.dev", code.to_lowercase());
        let name = format!("SK Chairman {code}");
        seeded.push(
            seed_actor(&actors, &name, &email, ActorRole::SkChairman, Some(tenant_id)).await?,
        );
    }

    // Tokens last a day so they are usable for manual testing.
    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: Duration::days(1).num_minutes(),
    });
    println!("\nDevelopment tokens:");
    for actor in &seeded {
        let token = jwt.generate_access_token(actor.id)?;
        println!("  {} ({}): {token}", actor.email, actor.role);
    }

    println!("\nSeeding complete! ({})", Utc::now().to_rfc3339());
    Ok(())
}

/// Inserts a tenant unless its code is taken.
async fn seed_tenant(db: &DatabaseConnection, name: &str, code: &str) -> anyhow::Result<TenantId> {
    if let Some(existing) = tenants::Entity::find()
        .filter(tenants::Column::Code.eq(code))
        .one(db)
        .await?
    {
        println!("  {code} already exists, skipping...");
        return Ok(TenantId::from_uuid(existing.id));
    }

    let model = tenants::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        code: Set(code.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    println!("  Created {code}");

    Ok(TenantId::from_uuid(model.id))
}

/// Inserts an actor unless the email is taken.
async fn seed_actor(
    actors: &ActorRepository,
    full_name: &str,
    email: &str,
    role: ActorRole,
    tenant_id: Option<TenantId>,
) -> anyhow::Result<Actor> {
    if let Some(existing) = actors.find_by_email(email).await? {
        println!("  {email} already exists, skipping...");
        return Ok(existing);
    }

    let actor = actors.provision(full_name, email, role, tenant_id).await?;
    println!("  Created {email}");
    Ok(actor)
}
