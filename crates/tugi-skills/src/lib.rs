//! Concrete collaborators for the chat pipeline: generative model and remote document store.

pub use tugi_core::{GenerativeModel, RestaurantSource};

mod firestore;
mod model_router;

pub use firestore::FirestoreSource;
pub use model_router::{LlmMode, ModelRouter};
