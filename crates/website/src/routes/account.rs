//! Sign-in and sign-up entry points.
//!
//! The website only describes these forms; accounts are handled elsewhere.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: &'static str,
    pub required: bool,
}

impl FormField {
    const fn required(name: &'static str, kind: &'static str, label: &'static str) -> Self {
        Self {
            name,
            kind,
            label,
            required: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub title: &'static str,
    pub fields: &'static [FormField],
    /// Where to go for the other form.
    pub alternate: &'static str,
}

const SIGN_IN_FIELDS: &[FormField] = &[
    FormField::required("email", "email", "Email"),
    FormField::required("password", "password", "Password"),
];

const CREATE_ACCOUNT_FIELDS: &[FormField] = &[
    FormField::required("first_name", "text", "First name"),
    FormField::required("last_name", "text", "Last name"),
    FormField::required("email", "email", "Email"),
    FormField {
        name: "phone",
        kind: "tel",
        label: "Phone (optional)",
        required: false,
    },
];

/// GET /sign-in
pub async fn sign_in() -> Json<EntryView> {
    Json(EntryView {
        title: "Sign in",
        fields: SIGN_IN_FIELDS,
        alternate: "/create-account",
    })
}

/// GET /create-account
pub async fn create_account() -> Json<EntryView> {
    Json(EntryView {
        title: "Create account",
        fields: CREATE_ACCOUNT_FIELDS,
        alternate: "/sign-in",
    })
}
