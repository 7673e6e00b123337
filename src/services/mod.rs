mod gallery_service_impl;

pub use gallery_service_impl::GalleryServiceImpl;
