//! The InvoiceMe database schema, transcribed by hand from the migrations.

use super::{Cardinality, Catalog, DeleteAction, Relationship, TableDef};

pub const TITLE: &str = "InvoiceMe Database Schema";

const TABLES: &[(&str, &[&str])] = &[
    (
        "customers",
        &[
            "id (PK, UUID)",
            "company_name",
            "contact_name",
            "email (UNIQUE)",
            "phone",
            "street",
            "city",
            "state",
            "zip_code",
            "country",
            "customer_type",
            "credit_balance",
            "status",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "invoices",
        &[
            "id (PK, UUID)",
            "invoice_number (UNIQUE)",
            "customer_id (FK)",
            "issue_date",
            "due_date",
            "status",
            "payment_terms",
            "subtotal",
            "tax_amount",
            "discount_amount",
            "total_amount",
            "amount_paid",
            "balance_due",
            "notes",
            "sent_date",
            "paid_date",
            "version",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "line_items",
        &[
            "id (PK, UUID)",
            "invoice_id (FK)",
            "description",
            "quantity",
            "unit_price",
            "discount_type",
            "discount_value",
            "tax_rate",
            "sort_order",
            "created_at",
        ],
    ),
    (
        "payments",
        &[
            "id (PK, UUID)",
            "invoice_id (FK)",
            "customer_id (FK)",
            "amount",
            "payment_method",
            "payment_date",
            "payment_reference",
            "status",
            "created_by_user_id (FK)",
            "notes",
            "created_at",
        ],
    ),
    (
        "users",
        &[
            "id (PK, UUID)",
            "email (UNIQUE)",
            "password_hash",
            "full_name",
            "role",
            "customer_id (FK, nullable)",
            "status",
            "failed_login_count",
            "locked_until",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "recurring_invoice_templates",
        &[
            "id (PK, UUID)",
            "customer_id (FK)",
            "template_name",
            "frequency",
            "start_date",
            "end_date",
            "next_invoice_date",
            "status",
            "payment_terms",
            "auto_send",
            "created_by_user_id (FK)",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "template_line_items",
        &[
            "id (PK, UUID)",
            "template_id (FK)",
            "description",
            "quantity",
            "unit_price",
            "discount_type",
            "discount_value",
            "tax_rate",
            "sort_order",
        ],
    ),
    (
        "activity_feed",
        &[
            "id (PK, UUID)",
            "aggregate_id",
            "event_type",
            "description",
            "occurred_at",
            "user_id (FK, nullable)",
        ],
    ),
    (
        "password_reset_tokens",
        &[
            "id (PK, UUID)",
            "user_id (FK)",
            "token (UNIQUE)",
            "expires_at",
            "used",
            "created_at",
        ],
    ),
];

const N: Cardinality = Cardinality::OneToMany;
const RESTRICT: DeleteAction = DeleteAction::Restrict;
const CASCADE: DeleteAction = DeleteAction::Cascade;
const SET_NULL: DeleteAction = DeleteAction::SetNull;

#[rustfmt::skip]
const RELATIONSHIPS: &[(&str, &str, &str, Cardinality, DeleteAction)] = &[
    ("customers", "invoices", "customer_id", N, RESTRICT),
    ("customers", "payments", "customer_id", N, RESTRICT),
    ("customers", "recurring_invoice_templates", "customer_id", N, RESTRICT),
    ("customers", "users", "customer_id", N, SET_NULL),
    ("invoices", "line_items", "invoice_id", N, CASCADE),
    ("invoices", "payments", "invoice_id", N, RESTRICT),
    ("users", "payments", "created_by_user_id", N, SET_NULL),
    ("users", "recurring_invoice_templates", "created_by_user_id", N, RESTRICT),
    ("users", "activity_feed", "user_id", N, SET_NULL),
    ("users", "password_reset_tokens", "user_id", N, CASCADE),
    ("recurring_invoice_templates", "template_line_items", "template_id", N, CASCADE),
];

/// Build the InvoiceMe catalog (9 tables, 11 relationships)
pub fn invoiceme() -> Catalog {
    let mut catalog = Catalog::new(TITLE);

    for &(name, columns) in TABLES {
        catalog.add_table(TableDef::new(name, columns));
    }

    for &(parent, child, column, cardinality, on_delete) in RELATIONSHIPS {
        catalog.add_relationship(Relationship::new(
            parent,
            child,
            column,
            cardinality,
            on_delete,
        ));
    }

    catalog
}
