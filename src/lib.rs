/*!
 * # reflexlate - reflective translation with three LLM agents
 *
 * A Rust library that translates text through a translate, critique and
 * review loop run against an OpenAI-compatible chat completion API.
 *
 * ## Features
 *
 * - Draft translation by a translator agent
 * - Structured critique against a fixed four-point checklist
 * - Final ACCEPT/REVISE decision by a reviewer agent
 * - Per-run token usage and timing
 * - OpenAI and LM Studio (OpenAI-compatible) providers
 * - CLI and web form front ends
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The three-stage pipeline:
 *   - `translation::translator`: Draft translation
 *   - `translation::feedback`: Structured critique
 *   - `translation::reviewer`: Reflection and final decision
 *   - `translation::orchestrator`: Runs the stages in order
 * - `app_controller`: Input validation and pipeline wiring
 * - `web`: Web form and JSON API
 * - `language_utils`: ISO language code utilities
 * - `providers`: Chat completion clients:
 *   - `providers::openai`: OpenAI-compatible API client
 *   - `providers::mock`: Scripted provider for tests and offline runs
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;
pub mod web;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, InputStats};
pub use errors::{AppError, InputError, PipelineError, ProviderError};
pub use language_utils::{LanguagePair, get_language_name, normalize_to_part2t, resolve_language_name};
pub use translation::{PipelineConfig, PipelineResult, PipelineStatus, TranslationPipeline};
