mod docx_template;
mod universe_file;
