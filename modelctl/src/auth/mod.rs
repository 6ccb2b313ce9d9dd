//! Authentication for the admin API.
//!
//! The service trusts a single admin bearer token, configured at startup.
//! Every route under `/api/v1` passes through the middleware in
//! [`middleware`]; the health endpoint and the API docs do not.
//!
//! # Authentication Method
//!
//! Callers pass the token in the `Authorization: Bearer <token>` header.
//! A missing, malformed, or mismatched token yields a 401 with the
//! `TOKEN_VALIDATION_FAILED` error code. Token comparison goes through a
//! digest so the comparison time does not depend on how many leading bytes
//! match.

pub mod middleware;
