//! Domain entities: the session and client-side copies of server state.

pub mod account;
pub mod catalog;
pub mod review;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use account::{
    Captcha, CaptchaAnswer, LoginOtpRequest, LoginRequest, RefreshGrant, RegisterRequest,
    RegistrationOtpRequest, TokenGrant, UserAccount,
};
pub use catalog::{
    CartItem, InventoryRecord, InventoryUpdated, NewProduct, Order, OrderItem, OrderPlaced,
    PaymentReceipt, PaymentRequest, Product, ProductUpdate,
};
pub use review::{NewReview, RatingSummary, Review, ReviewEligibility, ReviewStatus};
pub use session::{Session, SessionState, StoredCredentials};
pub use token::AccessClaims;
