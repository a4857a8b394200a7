mod account_record;

use proc_macro::TokenStream;

/// Derive macro for per-user account records.
///
/// Generates an `AccountRecord` implementation so the type can be stored under
/// `<prefix>_<userId>` through `store.records::<T>()`.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, AccountRecord)]
/// #[record(prefix = "userAddress")]
/// pub struct ShippingAddress {
///     #[record(owner)]
///     pub user_id: UserId,
///     pub street: String,
/// }
/// ```
///
/// - `#[record(prefix = "...")]` on the struct sets the storage key prefix.
///   Defaults to `user` followed by the struct name (`userShippingAddress`).
/// - `#[record(owner)]` marks the field holding the owning `UserId`.
///   Defaults to a field named `user_id`.
#[proc_macro_derive(AccountRecord, attributes(record))]
pub fn derive_account_record(input: TokenStream) -> TokenStream {
    account_record::derive_account_record(input)
}
