#[derive(Debug, PartialEq)]
pub enum HdfsConfError {
    UnresolvedDefaultFS(String),
    UnresolvedNamenode(String),
}

pub type Result<T> = std::result::Result<T, HdfsConfError>;
