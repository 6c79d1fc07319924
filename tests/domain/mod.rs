mod destination_test;
mod file_type_test;
mod kinds_test;
