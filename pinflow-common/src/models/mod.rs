// File: pinflow-common/src/models/mod.rs
pub mod connection;
pub mod pin;
pub mod product;
pub mod user;

pub use connection::{Ack, ConnectionStatus, EtsyImport, PinterestCredentials};
pub use pin::{MediaType, Pin, PinDraft, PinStatus, PinUpdate};
pub use product::{
    AutomationMode, PainPointsRequest, Product, ProductDraft, ProductSource, ProductStatus,
    ProductVariant,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};
