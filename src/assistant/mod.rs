//! Conversational assistant — the chat widget behind "Assistant Allo Docteur".
//!
//! ARCHITECTURE
//! ============
//! Leaves first:
//! - [`log`]: append-only, turn-ordered message history.
//! - [`session`]: stateless client that replays prior turns plus the new
//!   prompt to the backend on every call.
//! - [`fallback`]: the single choke point for replies. Substitutes a
//!   simulation notice when no credential is configured and an apology when
//!   the backend fails, so callers always receive text.
//! - [`widget`]: open/closed + pending state machine that owns the
//!   conversation and publishes a fresh view after every mutation.

pub mod config;
pub mod fallback;
pub mod log;
pub mod session;
pub mod widget;

pub use config::AssistantConfig;
pub use fallback::FallbackPolicy;
pub use log::{ChatTurn, MessageLog, Role};
pub use session::SessionClient;
pub use widget::{ConversationState, HostUser, SubmitError, UserRole, WidgetController, WidgetPhase, WidgetView};

/// Seeded first turn of every conversation.
pub const GREETING: &str = "Bonjour ! Je suis l'assistant Allo Docteur. Comment puis-je vous aider ?";

/// Persona, domain and safety boundary sent with every backend call.
pub const SYSTEM_INSTRUCTION: &str = "Tu es un assistant médical virtuel utile et empathique pour la plateforme \
Allo Docteur au Sénégal. Tu aides les utilisateurs à trouver des médecins à Dakar et dans les régions, à naviguer \
sur le site de prise de rendez-vous, et à comprendre des termes médicaux simples. Tu ne donnes pas de conseils \
médicaux critiques ou de diagnostics. Réponds toujours en français.";

/// Reply used when no backend credential is configured.
pub const SIMULATION_NOTICE: &str = "Mode simulation (Clé API manquante). En production, je répondrai via le \
service d'IA en tenant compte de votre historique de conversation.";

/// Reply used when the backend answered without any text.
pub const EMPTY_REPLY: &str = "Désolé, je n'ai pas pu générer de réponse.";

/// Reply used when the backend call failed or timed out.
pub const BACKEND_APOLOGY: &str = "Désolé, je ne peux pas répondre pour le moment. Veuillez réessayer plus tard.";
