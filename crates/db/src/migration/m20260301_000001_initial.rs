//! Initial database migration.
//!
//! Creates the ledger tables, enums, and the triggers that keep
//! transactions and audit entries append-only.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: DIRECTORY
        // ============================================================
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(ACTORS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(BUDGET_ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: AUDIT
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;

        // ============================================================
        // PART 5: APPEND-ONLY GUARDS
        // ============================================================
        db.execute_unprepared(APPEND_ONLY_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE actor_role AS ENUM (
    'main_admin',
    'sk_chairman',
    'sk_secretary',
    'kagawad'
);

CREATE TYPE transaction_type AS ENUM ('add', 'deduct');
";

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    code VARCHAR(50) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_tenants_name ON tenants(name);
";

const ACTORS_SQL: &str = r"
CREATE TABLE actors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role actor_role NOT NULL,
    tenant_id UUID REFERENCES tenants(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_actor_tenant_binding CHECK (
        role = 'main_admin' OR tenant_id IS NOT NULL
    )
);

CREATE INDEX idx_actors_tenant ON actors(tenant_id) WHERE is_active = true;
";

const BUDGET_ACCOUNTS_SQL: &str = r"
CREATE TABLE budget_accounts (
    tenant_id UUID PRIMARY KEY REFERENCES tenants(id),
    total_budget NUMERIC(20, 2) NOT NULL DEFAULT 0,
    available_budget NUMERIC(20, 2) NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_budget_bounds CHECK (
        available_budget >= 0 AND available_budget <= total_budget
    )
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    amount NUMERIC(15, 2) NOT NULL,
    type transaction_type NOT NULL,
    description VARCHAR(500),
    created_by UUID NOT NULL REFERENCES actors(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_transaction_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_transactions_tenant_created ON transactions(tenant_id, created_at DESC);
CREATE INDEX idx_transactions_deducts ON transactions(tenant_id, created_at) WHERE type = 'deduct';
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    actor_id UUID NOT NULL,
    action VARCHAR(50) NOT NULL,
    table_name VARCHAR(100) NOT NULL,
    record_id UUID,
    tenant_id UUID,
    details JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_created ON audit_logs(created_at DESC);
";

const APPEND_ONLY_SQL: &str = r"
CREATE OR REPLACE FUNCTION reject_history_change()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION '% is append-only', TG_TABLE_NAME;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_transactions_append_only
BEFORE UPDATE OR DELETE ON transactions
FOR EACH ROW
EXECUTE FUNCTION reject_history_change();

CREATE TRIGGER trg_audit_logs_append_only
BEFORE UPDATE OR DELETE ON audit_logs
FOR EACH ROW
EXECUTE FUNCTION reject_history_change();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS budget_accounts CASCADE;
DROP TABLE IF EXISTS actors CASCADE;
DROP TABLE IF EXISTS tenants CASCADE;
DROP FUNCTION IF EXISTS reject_history_change() CASCADE;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS actor_role;
";
