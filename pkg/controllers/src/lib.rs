pub mod externaldns;
pub mod rbac;

#[cfg(test)]
pub(crate) mod testing;
