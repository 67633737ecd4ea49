pub mod demande;
pub mod domaine;
pub mod filiere;
pub mod pfe;
pub mod prerequisite;
pub mod user;

pub use demande::{Demande, DemandeDetail};
pub use domaine::Domaine;
pub use filiere::Filiere;
pub use pfe::{Pfe, PfeDetail};
pub use prerequisite::Prerequisite;
pub use user::{PublicUser, User};
