pub(crate) mod storage_paths;
