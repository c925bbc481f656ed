pub mod order_id;
pub mod payment_signature;

pub use order_id::{generate_order_id, generate_order_id_with_jitter};
pub use payment_signature::{
    payment_link,
    verify_result_signature,
    verify_success_signature,
    ProviderCredentials,
};
