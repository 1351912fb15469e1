//! Documentation module for the courier project.
//!
//! This module contains high-level documentation to explain the project, define terms and aid
//! navigation of the other documentation.

pub mod glossary;
