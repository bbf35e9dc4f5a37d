mod arena;
mod node;
mod raw_abtree;
mod validate;

pub(crate) use raw_abtree::RawABTree;
