pub mod workdir;
