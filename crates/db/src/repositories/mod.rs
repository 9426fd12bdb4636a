mod export_job_repo;

pub use export_job_repo::ExportJobRepo;
