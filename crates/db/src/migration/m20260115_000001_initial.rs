//! Initial database migration.
//!
//! Creates all enums and core tables: catalogs (clients, companies, banks,
//! brokers, schemes), operations with derived commission columns, returns,
//! broker commissions, invoicing, bank movements, and payment application.

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
        // PART 2: USERS & CATALOGS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(BANKS_SQL).await?;
        db.execute_unprepared(BROKERS_SQL).await?;
        db.execute_unprepared(SCHEMES_SQL).await?;

        // ============================================================
        // PART 3: OPERATIONS & COMMISSIONS
        // ============================================================
        db.execute_unprepared(OPERATIONS_SQL).await?;
        db.execute_unprepared(OPERATION_RETURNS_SQL).await?;
        db.execute_unprepared(BROKER_COMMISSIONS_SQL).await?;

        // ============================================================
        // PART 4: INVOICING
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_CONCEPTS_SQL).await?;

        // ============================================================
        // PART 5: BANK MOVEMENTS & RECONCILIATION
        // ============================================================
        db.execute_unprepared(BANK_MOVEMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_APPLICATIONS_SQL).await?;
        db.execute_unprepared(INVOICE_BANK_LINKS_SQL).await?;

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
-- User roles
CREATE TYPE user_role AS ENUM ('admin', 'operator');

-- Commission scheme types
CREATE TYPE scheme_type AS ENUM (
    'FACTURA',
    'SINDICATO',
    'SAPI',
    'C909',
    'BANCARIZACION',
    'CONTABILIDAD'
);

-- Basis the percentages apply to
CREATE TYPE cost_basis AS ENUM ('TOTAL', 'SUBTOTAL');

-- Broker commission lifecycle
CREATE TYPE commission_status AS ENUM ('PENDING', 'PAID', 'CANCELLED');

-- Invoice lifecycle
CREATE TYPE invoice_status AS ENUM ('PENDING', 'PAID', 'CANCELLED');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role user_role NOT NULL DEFAULT 'operator',
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    site VARCHAR(100) NOT NULL,
    origin VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_clients_site ON clients(site);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    rfc VARCHAR(13),
    line_of_business VARCHAR(255),
    destination VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BANKS_SQL: &str = r"
CREATE TABLE banks (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    bank_name VARCHAR(100) NOT NULL,
    account_number VARCHAR(20) NOT NULL,
    clabe VARCHAR(18),
    initial_balance NUMERIC(15, 2) NOT NULL DEFAULT 0,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_banks_company ON banks(company_id);
";

const BROKERS_SQL: &str = r"
CREATE TABLE brokers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SCHEMES_SQL: &str = r"
CREATE TABLE schemes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    scheme_type scheme_type NOT NULL,
    scheme_percent NUMERIC(5, 2) NOT NULL,
    cost_basis cost_basis NOT NULL DEFAULT 'SUBTOTAL',
    broker1_id UUID REFERENCES brokers(id),
    broker1_percent NUMERIC(5, 2),
    broker2_id UUID REFERENCES brokers(id),
    broker2_percent NUMERIC(5, 2),
    broker3_id UUID REFERENCES brokers(id),
    broker3_percent NUMERIC(5, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const OPERATIONS_SQL: &str = r"
CREATE TABLE operations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_number BIGINT NOT NULL UNIQUE,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,

    -- Scheme snapshot at capture time
    scheme_type scheme_type NOT NULL,
    scheme_percent NUMERIC(5, 2) NOT NULL,
    cost_basis cost_basis NOT NULL DEFAULT 'SUBTOTAL',
    broker1_id UUID REFERENCES brokers(id),
    broker1_percent NUMERIC(5, 2),
    broker2_id UUID REFERENCES brokers(id),
    broker2_percent NUMERIC(5, 2),
    broker3_id UUID REFERENCES brokers(id),
    broker3_percent NUMERIC(5, 2),

    -- Amounts
    deposit NUMERIC(15, 2),
    subtotal NUMERIC(15, 2),
    vat NUMERIC(15, 2),
    total NUMERIC(15, 2),

    operation_date DATE NOT NULL,
    invoice_folio VARCHAR(50),
    reference VARCHAR(255),
    receipt_url VARCHAR(500),

    -- Derived commission breakdown
    general_percent NUMERIC(5, 2) NOT NULL DEFAULT 0,
    general_amount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    savings_fund NUMERIC(15, 2) NOT NULL DEFAULT 0,
    free_savings_fund NUMERIC(15, 2) NOT NULL DEFAULT 0,
    partner_share_a NUMERIC(15, 2) NOT NULL DEFAULT 0,
    partner_share_b NUMERIC(15, 2) NOT NULL DEFAULT 0,

    -- Running balance; returns subtract from it and it may go negative
    balance NUMERIC(15, 2) NOT NULL DEFAULT 0,

    -- Optimistic concurrency control for recalculation
    version BIGINT NOT NULL DEFAULT 1,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_operations_client ON operations(client_id);
CREATE INDEX idx_operations_company ON operations(company_id);
CREATE INDEX idx_operations_date ON operations(operation_date);
";

const OPERATION_RETURNS_SQL: &str = r"
CREATE TABLE operation_returns (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL REFERENCES operations(id) ON DELETE CASCADE,
    payment_date DATE NOT NULL,
    amount_paid NUMERIC(15, 2) NOT NULL,
    payment_method VARCHAR(50),
    reference VARCHAR(255),
    receipt_url VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_operation_returns_operation ON operation_returns(operation_id);
";

const BROKER_COMMISSIONS_SQL: &str = r"
CREATE TABLE broker_commissions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    broker_id UUID NOT NULL REFERENCES brokers(id) ON DELETE CASCADE,
    operation_id UUID NOT NULL REFERENCES operations(id) ON DELETE CASCADE,
    amount NUMERIC(15, 2) NOT NULL,
    status commission_status NOT NULL DEFAULT 'PENDING',
    payment_method VARCHAR(50),
    payment_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_broker_commissions_broker ON broker_commissions(broker_id);
CREATE INDEX idx_broker_commissions_operation ON broker_commissions(operation_id);
CREATE INDEX idx_broker_commissions_status ON broker_commissions(status);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    receiver VARCHAR(255) NOT NULL,
    rfc VARCHAR(13),
    folio VARCHAR(50) NOT NULL UNIQUE,
    cfdi_uuid VARCHAR(36),
    voucher_type VARCHAR(10),
    status invoice_status NOT NULL DEFAULT 'PENDING',
    issue_date DATE NOT NULL,
    payment_method VARCHAR(10),
    payment_form VARCHAR(10),
    subtotal NUMERIC(15, 2) NOT NULL DEFAULT 0,
    vat NUMERIC(15, 2) NOT NULL DEFAULT 0,
    total NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoices_company ON invoices(company_id);
CREATE INDEX idx_invoices_status ON invoices(status);
";

const INVOICE_CONCEPTS_SQL: &str = r"
CREATE TABLE invoice_concepts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    description VARCHAR(500) NOT NULL,
    quantity NUMERIC(15, 2) NOT NULL DEFAULT 1,
    unit_price NUMERIC(15, 2) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoice_concepts_invoice ON invoice_concepts(invoice_id);
";

const BANK_MOVEMENTS_SQL: &str = r"
CREATE TABLE bank_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    bank_id UUID NOT NULL REFERENCES banks(id) ON DELETE CASCADE,
    inflow NUMERIC(15, 2) NOT NULL DEFAULT 0,
    outflow NUMERIC(15, 2) NOT NULL DEFAULT 0,
    movement_date DATE NOT NULL,
    description VARCHAR(500),
    reference VARCHAR(255),
    comments VARCHAR(500),
    invoice_id UUID REFERENCES invoices(id) ON DELETE SET NULL,
    user_id UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_flow_non_negative CHECK (inflow >= 0 AND outflow >= 0)
);

CREATE INDEX idx_bank_movements_bank ON bank_movements(bank_id, movement_date);
";

const PAYMENT_APPLICATIONS_SQL: &str = r"
CREATE TABLE payment_applications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL REFERENCES operations(id) ON DELETE CASCADE,
    bank_movement_id UUID NOT NULL REFERENCES bank_movements(id) ON DELETE CASCADE,
    amount_applied NUMERIC(15, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_applied_positive CHECK (amount_applied > 0)
);

CREATE INDEX idx_payment_applications_operation ON payment_applications(operation_id);
CREATE INDEX idx_payment_applications_movement ON payment_applications(bank_movement_id);
";

const INVOICE_BANK_LINKS_SQL: &str = r"
CREATE TABLE invoice_bank_links (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    bank_movement_id UUID NOT NULL REFERENCES bank_movements(id) ON DELETE CASCADE,
    amount_assigned NUMERIC(15, 2) NOT NULL,
    assigned_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_assigned_positive CHECK (amount_assigned > 0),
    UNIQUE (invoice_id, bank_movement_id)
);

CREATE INDEX idx_invoice_bank_links_invoice ON invoice_bank_links(invoice_id);
CREATE INDEX idx_invoice_bank_links_movement ON invoice_bank_links(bank_movement_id);
";

const DROP_ALL_SQL: &str = r"
-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS invoice_bank_links CASCADE;
DROP TABLE IF EXISTS payment_applications CASCADE;
DROP TABLE IF EXISTS bank_movements CASCADE;
DROP TABLE IF EXISTS invoice_concepts CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS broker_commissions CASCADE;
DROP TABLE IF EXISTS operation_returns CASCADE;
DROP TABLE IF EXISTS operations CASCADE;
DROP TABLE IF EXISTS schemes CASCADE;
DROP TABLE IF EXISTS brokers CASCADE;
DROP TABLE IF EXISTS banks CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS invoice_status CASCADE;
DROP TYPE IF EXISTS commission_status CASCADE;
DROP TYPE IF EXISTS cost_basis CASCADE;
DROP TYPE IF EXISTS scheme_type CASCADE;
DROP TYPE IF EXISTS user_role CASCADE;
";
