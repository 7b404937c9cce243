pub(crate) mod use_random;
