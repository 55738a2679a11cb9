mod common;
mod sponsored_reveal;
