pub mod bookshelf_cmd;
pub mod borrow_cmd;
pub mod detail_cmd;
pub mod fulfill_cmd;
pub mod revoke_cmd;

#[cfg(test)]
pub(crate) mod testing;
